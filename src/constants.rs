//! Built-in defaults shared across the crate

use std::time::Duration;

/// Template used when the user has not configured one
pub const DEFAULT_TEMPLATE: &str = "- ${link}\n- ${title}";

/// Default container selector on bilibili video pages
pub const DEFAULT_BILIBILI_SELECTOR: &str = ".up-detail-top";

/// Default caption selector on douyin video pages
pub const DEFAULT_DOUYIN_SELECTOR: &str = ".title";

/// Anchor looked up inside the bilibili container
pub const BILIBILI_AUTHOR_ANCHOR: &str = "a.up-name";

/// Attribute carrying the video id, two levels above the douyin caption
pub const DOUYIN_VIDEO_ID_ATTR: &str = "data-e2e-aweme-id";
pub const DOUYIN_VIDEO_ID_DEPTH: usize = 2;

/// `{id}` is replaced with the video id
pub const DOUYIN_VIDEO_URL: &str = "https://www.douyin.com/video/{id}";

pub const BILIBILI_HOST: &str = "bilibili.com";
pub const DOUYIN_HOST: &str = "douyin.com";

/// Keyboard command names, as registered by the host
pub const COMMAND_COPY_LINK_AND_TITLE: &str = "copy_link_and_title";
pub const COMMAND_COPY_BILIBILI_AUTHOR: &str = "copy_bilibili_author";
pub const COMMAND_COPY_DOUYIN_BODY: &str = "copy_douyin_body";

/// Context menu item ids
pub const MENU_COPY_LINK_AND_TITLE: &str = "TCEcopyLinkAndTitle";
pub const MENU_BILIBILI: &str = "TCEbilibiliEnhance";
pub const MENU_DOUYIN: &str = "TCEdouyinEnhance";

/// Column at which shortcut hints start in menu labels
pub const MENU_LABEL_WIDTH: usize = 36;

/// Pause between removing and recreating menu entries
pub const REBUILD_SETTLE_DELAY: Duration = Duration::from_millis(50);

pub const NOTIFY_SUCCESS_TITLE: &str = "Copied";
pub const NOTIFY_FAILURE_TITLE: &str = "Copy failed";
