pub mod app_user_wallet;
pub mod app_wallet_transaction;
pub mod app_withdrawal_record;

pub use app_user_wallet::AppUserWallet;
pub use app_wallet_transaction::AppWalletTransaction;
pub use app_withdrawal_record::AppWithdrawalRecord;
