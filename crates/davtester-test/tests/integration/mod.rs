mod caldav;
mod helpers;
mod hooks;
mod reporting;
mod webdav;
