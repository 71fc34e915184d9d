pub mod app_crowdfunding_project;
pub mod app_crowdfunding_share;
pub mod app_project_period_income;
pub mod app_profit_sharing;

pub use app_crowdfunding_project::AppCrowdfundingProject;
pub use app_crowdfunding_share::AppCrowdfundingShare;
pub use app_project_period_income::AppProjectPeriodIncome;
pub use app_profit_sharing::AppProfitSharing;
