// 结算核心模块
//
// 钱包、提现、积分与众筹分润的全部账务逻辑。
// 所有余额变动经由 WalletService 的单一入口落账并伴随一条流水，
// HTTP 层与定时任务共用同一套服务方法

pub mod service;

pub use service::crowdfunding_service::CrowdfundingService;
pub use service::ledger_store::LedgerStore;
pub use service::points_service::PointsService;
pub use service::profit_sharing_service::ProfitSharingService;
pub use service::wallet_service::{ChangeReq, WalletService};
pub use service::withdrawal_service::{WithdrawalAccount, WithdrawalService};
