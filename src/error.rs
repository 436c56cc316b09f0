#[repr(i32)]
pub enum ExitCode {
    GtkDisplay = 1,
    CreateBar = 2,
    ServiceUnavailable = 3,
}

pub const ERR_CHANNEL_SEND: &str = "Failed to send message to channel";
