// 服务层模块
//
// - request: 远程调用与响应归一
// - mutation: 变更执行与缓存失效
// - roster: Roster 领域的查询、变更、列与表单

pub mod mutation;
pub mod request;
pub mod roster;

pub use mutation::{MutationDescriptor, MutationError, MutationRunner, MutationStatus};
pub use request::{RequestClient, RequestError};
pub use roster::RosterApi;
