//! zpad - 虚拟文件注册表与双窗格编辑会话库
//!
//! 模块结构：
//! - models: 数据模型（FileStore, NameValidator, EditBuffer）
//! - kernel: 无界面核心（Store, Action, EditorState, 持久化）
//! - kernel::services: 配置、路径与键值存储

pub mod kernel;
pub mod models;
