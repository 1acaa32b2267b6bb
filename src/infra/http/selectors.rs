//! CSS selectors targeted by datastar element patches.

pub const POSTS_PANEL: &str = "[data-posts=\"panel\"]";
pub const POST_MODAL: &str = "[data-posts=\"modal\"]";
pub const TOAST_STACK: &str = "[data-posts=\"toasts\"]";
