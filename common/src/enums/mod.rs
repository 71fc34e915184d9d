// 枚举模块
pub mod wallet;
pub mod withdrawal;
pub mod points;
pub mod crowdfunding;

pub use wallet::{WalletChangeType, WalletStatus};
pub use withdrawal::{WithdrawalMethod, WithdrawalStatus};
pub use points::{PointsChangeType, PointsSource, PointsStatus};
pub use crowdfunding::{ProfitSharingStatus, ProjectStatus, ShareStatus};
