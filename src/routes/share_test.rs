use super::*;

#[test]
fn share_link_points_at_public_page() {
    let link = ShareLink::new("ABCD2345");
    assert_eq!(link.share_code, "ABCD2345");
    assert_eq!(link.share_path, "/share/ABCD2345");
}

#[test]
fn malformed_and_unknown_codes_look_the_same() {
    assert_eq!(share_error_to_status(ShareError::InvalidCode), StatusCode::NOT_FOUND);
    assert_eq!(share_error_to_status(ShareError::NotFound), StatusCode::NOT_FOUND);
}

#[test]
fn database_failure_is_internal_error() {
    assert_eq!(share_error_to_status(ShareError::Db(sqlx::Error::PoolTimedOut)), StatusCode::INTERNAL_SERVER_ERROR);
}
