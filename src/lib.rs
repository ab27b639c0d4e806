//! Zipview - 压缩包漫画阅读器核心
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Page Context: 页面、目录、压缩包标识、内容句柄
//! - Session Context: 阅读会话聚合与偏好设置
//!
//! 应用层 (application/):
//! - Ports: 端口定义（BlobCache, StateStore, ArchiveReader）
//! - Loader: 压缩包导入流程
//! - SessionStore: 阅读会话状态机与缓存恢复
//! - Commands / Queries: CQRS 处理器
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Zip 解析
//! - Persistence: Sled 页面缓存与会话记录
//! - Memory: 内存实现与不可用环境的占位实现

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
