use super::*;

#[test]
fn incomplete_image_is_loading() {
    assert_eq!(status_of(false, 0), LoadState::Loading);
    assert_eq!(status_of(false, 640), LoadState::Loading);
}

#[test]
fn complete_image_with_pixels_is_ready() {
    assert_eq!(status_of(true, 640), LoadState::Ready);
}

#[test]
fn complete_image_without_pixels_is_broken() {
    assert_eq!(status_of(true, 0), LoadState::Broken);
}
