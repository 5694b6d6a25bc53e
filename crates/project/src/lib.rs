//! Project list persistence and the filesystem-backed project tree.
//! 專案清單的持久化與以檔案系統為後盾的專案樹。

pub mod project;
pub mod store;
pub mod tree;

pub use project::Project;
pub use store::{ProjectStore, ProjectStoreError};
pub use tree::{absolute_root, CreateOutcome, FileTree, NodeKind, TreeError, TreeNode, TreeRow};
