// 定时任务模块
//
// 任务只做调度与日志，账务口径全部复用 settlement 的服务方法，
// 与请求链路共用同一套逻辑
pub mod points_job;
pub mod profit_sharing_job;
pub mod crowdfunding_job;
