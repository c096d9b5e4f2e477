//! 北向转发：读数重组 → JSON 序列化 → 发布，并向宿主报告进度。

mod forwarder;
mod plugin;

pub use forwarder::{ForwardError, Forwarder};
pub use plugin::{
    PluginHandle, plugin_info, plugin_init, plugin_reconfigure, plugin_send, plugin_shutdown,
};
