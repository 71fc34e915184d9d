use std::sync::Arc;

use common::enums::{PointsChangeType, PointsSource, PointsStatus};
use common::utils::{date_util, snowflake};
use common::{AppError, AppResult};
use orm::entities::{AppOwnerPoints, AppPointsTransaction};
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::begin_tx;

/// 积分服务
///
/// 与钱包服务平行的一套非货币账本，无冻结概念。
/// 入账按来源折算并取整，账户惰性创建，按来源赋予有效期
pub struct PointsService {
    rb: Arc<RBatis>,
}

impl PointsService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 积分入账
    ///
    /// 返回实际入账积分数；折算结果为零时不产生任何记录
    pub async fn earn_points(
        &self,
        user_id: i64,
        amount: Decimal,
        source: PointsSource,
        related_id: Option<i64>,
        ratio: Option<u32>,
    ) -> AppResult<i64> {
        let points = points_for(source, amount, ratio)?;
        if points == 0 {
            return Ok(0);
        }

        let mut tx = begin_tx(&self.rb).await?;
        let earned =
            Self::earn_points_tx(&mut tx, user_id, amount, source, related_id, ratio).await?;
        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(earned)
    }

    /// 积分入账（组合进调用方事务）
    pub async fn earn_points_tx(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
        amount: Decimal,
        source: PointsSource,
        related_id: Option<i64>,
        ratio: Option<u32>,
    ) -> AppResult<i64> {
        let points = points_for(source, amount, ratio)?;
        if points == 0 {
            return Ok(0);
        }

        let mut account = Self::get_or_create_account(tx, user_id, source).await?;

        account.balance += points;
        account.total_earned += points;
        account.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "user_id": user_id };
        AppOwnerPoints::update_by_map(tx, &account, where_map).await?;

        Self::append_transaction(
            tx,
            &account,
            PointsChangeType::Earn,
            points,
            Some(source),
            related_id,
            source.description(),
        )
        .await?;

        Ok(points)
    }

    /// 使用积分
    pub async fn use_points(&self, user_id: i64, points: i64) -> AppResult<AppOwnerPoints> {
        if points <= 0 {
            return Err(AppError::ValidationError(format!(
                "使用积分数必须为正数: {}",
                points
            )));
        }

        let mut tx = begin_tx(&self.rb).await?;

        let mut account = AppOwnerPoints::select_by_user_id_for_update(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("积分账户不存在: user_id={}", user_id)))?;

        let status = PointsStatus::from_code(account.status)
            .ok_or_else(|| AppError::InvalidState(format!("未知积分账户状态: {}", account.status)))?;
        if !status.is_active() {
            return Err(AppError::AccountInactive(format!(
                "user_id={} 状态={}",
                user_id,
                status.description()
            )));
        }
        if account.balance < points {
            return Err(AppError::InsufficientPoints(format!(
                "余额 {} 使用 {}",
                account.balance, points
            )));
        }

        account.balance -= points;
        account.total_used += points;
        account.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "user_id": user_id };
        AppOwnerPoints::update_by_map(&mut tx, &account, where_map).await?;

        Self::append_transaction(
            &mut tx,
            &account,
            PointsChangeType::Use,
            -points,
            None,
            None,
            "积分使用",
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(account)
    }

    /// 过期扫描（每日任务）
    ///
    /// 逐账户独立事务，单个账户失败记录日志后继续
    pub async fn expire_points(&self) -> AppResult<usize> {
        let accounts = AppOwnerPoints::select_expired(
            self.rb.as_ref(),
            PointsStatus::Active.get_code(),
            DateTime::now(),
        )
        .await?;

        let mut expired = 0;
        for account in &accounts {
            match self
                .zero_account(account.user_id, PointsChangeType::Expire, PointsStatus::Expired)
                .await
            {
                Ok(true) => expired += 1,
                Ok(false) => {}
                Err(e) => {
                    log::error!("积分过期处理失败 user_id={}: {}", account.user_id, e);
                }
            }
        }
        log::info!("积分过期扫描完成: 命中 {} 处理 {}", accounts.len(), expired);
        Ok(expired)
    }

    /// 年度清零（每年任务）
    pub async fn clear_points(&self) -> AppResult<usize> {
        let accounts = AppOwnerPoints::select_active_with_balance(
            self.rb.as_ref(),
            PointsStatus::Active.get_code(),
        )
        .await?;

        let mut cleared = 0;
        for account in &accounts {
            match self
                .zero_account(account.user_id, PointsChangeType::Clear, PointsStatus::Cleared)
                .await
            {
                Ok(true) => cleared += 1,
                Ok(false) => {}
                Err(e) => {
                    log::error!("积分清零处理失败 user_id={}: {}", account.user_id, e);
                }
            }
        }
        log::info!("积分年度清零完成: 命中 {} 处理 {}", accounts.len(), cleared);
        Ok(cleared)
    }

    /// 锁行后清零单个账户
    ///
    /// 扫描快照可能过期，锁行后逐项复核；不满足条件返回 false
    async fn zero_account(
        &self,
        user_id: i64,
        change_type: PointsChangeType,
        final_status: PointsStatus,
    ) -> AppResult<bool> {
        let mut tx = begin_tx(&self.rb).await?;

        let mut account = AppOwnerPoints::select_by_user_id_for_update(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("积分账户不存在: user_id={}", user_id)))?;

        if account.status != PointsStatus::Active.get_code() || account.balance <= 0 {
            return Ok(false);
        }
        if change_type == PointsChangeType::Expire {
            let past = account
                .expiry_date
                .as_ref()
                .map(date_util::is_past)
                .unwrap_or(false);
            if !past {
                return Ok(false);
            }
        }

        let amount = account.balance;
        account.balance = 0;
        account.status = final_status.get_code();
        account.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "user_id": user_id };
        AppOwnerPoints::update_by_map(&mut tx, &account, where_map).await?;

        Self::append_transaction(
            &mut tx,
            &account,
            change_type,
            -amount,
            None,
            None,
            change_type.description(),
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(true)
    }

    /// 锁定读取积分账户，不存在则创建，过期/清零则复活
    async fn get_or_create_account(
        tx: &mut RBatisTxExecutorGuard,
        user_id: i64,
        source: PointsSource,
    ) -> AppResult<AppOwnerPoints> {
        if let Some(mut account) = AppOwnerPoints::select_by_user_id_for_update(tx, user_id).await? {
            let status = PointsStatus::from_code(account.status).ok_or_else(|| {
                AppError::InvalidState(format!("未知积分账户状态: {}", account.status))
            })?;
            if !status.is_active() {
                account.status = PointsStatus::Active.get_code();
                account.expiry_date = Some(date_util::days_from_now(source.validity_days()));
                log::info!("积分账户复活: user_id={} 原状态={}", user_id, status.description());
            }
            return Ok(account);
        }

        let now = DateTime::now();
        let account = AppOwnerPoints {
            id: None,
            user_id,
            balance: 0,
            total_earned: 0,
            total_used: 0,
            expiry_date: Some(date_util::days_from_now(source.validity_days())),
            status: PointsStatus::Active.get_code(),
            create_time: Some(now.clone()),
            update_time: Some(now),
        };
        AppOwnerPoints::insert(tx, &account).await?;

        AppOwnerPoints::select_by_user_id_for_update(tx, user_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(format!("积分账户创建后读取失败: user_id={}", user_id))
            })
    }

    async fn append_transaction(
        tx: &mut RBatisTxExecutorGuard,
        account: &AppOwnerPoints,
        change_type: PointsChangeType,
        amount: i64,
        source: Option<PointsSource>,
        related_id: Option<i64>,
        remark: impl Into<String>,
    ) -> AppResult<()> {
        let entry = AppPointsTransaction {
            id: None,
            serial_no: Some(snowflake::generate_id_string()),
            account_id: account.id.unwrap_or_default(),
            user_id: account.user_id,
            change_type: change_type.get_code(),
            change_type_name: Some(change_type.description()),
            amount,
            balance_after: account.balance,
            source: source.map(|s| s.get_code()),
            related_id,
            remark: Some(remark.into()),
            create_time: Some(DateTime::now()),
        };
        AppPointsTransaction::insert(tx, &entry).await?;
        Ok(())
    }
}

/// 金额折算积分
///
/// 按来源确定除数后向下取整；活动/治理类允许调用方覆盖比例
fn points_for(source: PointsSource, amount: Decimal, ratio: Option<u32>) -> AppResult<i64> {
    if amount <= Decimal::ZERO {
        return Err(AppError::ValidationError(format!(
            "积分折算金额必须为正数: {}",
            amount
        )));
    }
    let divisor = match source {
        PointsSource::Activity | PointsSource::Governance => {
            ratio.unwrap_or_else(|| source.default_divisor())
        }
        _ => source.default_divisor(),
    };
    if divisor == 0 {
        return Err(AppError::ValidationError("积分折算比例不能为零".to_string()));
    }

    (amount / Decimal::from(divisor))
        .floor()
        .to_i64()
        .ok_or_else(|| AppError::ValidationError(format!("积分折算溢出: {}", amount)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_points_for_purchase() {
        assert_eq!(points_for(PointsSource::Purchase, d(100), None).unwrap(), 10);
        assert_eq!(points_for(PointsSource::Purchase, d(99), None).unwrap(), 9);
        assert_eq!(points_for(PointsSource::Purchase, d(5), None).unwrap(), 0);
        // 小数金额同样向下取整
        assert_eq!(
            points_for(PointsSource::Purchase, Decimal::new(1055, 1), None).unwrap(),
            10
        );
    }

    #[test]
    fn test_points_for_referral() {
        assert_eq!(points_for(PointsSource::Referral, d(100), None).unwrap(), 1);
        assert_eq!(points_for(PointsSource::Referral, d(99), None).unwrap(), 0);
        // 推荐来源不受自定义比例影响
        assert_eq!(points_for(PointsSource::Referral, d(100), Some(2)).unwrap(), 1);
    }

    #[test]
    fn test_points_for_activity_ratio() {
        assert_eq!(points_for(PointsSource::Activity, d(100), None).unwrap(), 10);
        assert_eq!(points_for(PointsSource::Activity, d(100), Some(20)).unwrap(), 5);
        assert_eq!(points_for(PointsSource::Governance, d(100), Some(25)).unwrap(), 4);
    }

    #[test]
    fn test_points_for_invalid_input() {
        assert!(matches!(
            points_for(PointsSource::Purchase, d(0), None),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            points_for(PointsSource::Purchase, d(-10), None),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            points_for(PointsSource::Activity, d(100), Some(0)),
            Err(AppError::ValidationError(_))
        ));
    }
}
