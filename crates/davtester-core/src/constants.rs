/// Name shared by the binary, its config file and its environment prefix.
pub const APP_NAME: &str = "davtester";

pub const CONFIG_FILE_STEM: &str = APP_NAME;
pub const CONFIG_FILE_NAME: &str = const_str::concat!(CONFIG_FILE_STEM, ".toml");
pub const ENV_PREFIX: &str = "DAVTESTER";

/// Value written over server-assigned `X-CALENDARSERVER-DTSTAMP` parameters.
pub const DTSTAMP_SENTINEL: &str = "20080101T000000Z";

/// Feature a server advertises when it keeps the `EMAIL` parameter on
/// calendar user addresses.
pub const FEATURE_EMAIL_PARAMETER: &str = "EMAIL parameter";

/// Number of rotating `$uidN:` substitutions owned by the server info.
pub const UID_SUBSTITUTION_COUNT: usize = 9;
