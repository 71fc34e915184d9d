use std::sync::Arc;

use common::config::ProfitSharingConfig;
use common::enums::{ProfitSharingStatus, ProjectStatus, ShareStatus};
use common::utils::period_util;
use common::{AppError, AppResult};
use orm::entities::{
    AppCrowdfundingProject, AppCrowdfundingShare, AppProfitSharing, AppProjectPeriodIncome,
};
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::{Decimal, RoundingStrategy};

use super::begin_tx;
use super::wallet_service::WalletService;

/// 分润计算与发放
///
/// 每 (项目, 周期) 只计算一次，金额一经落库不再重算；
/// 发放逐行独立事务，失败行置为失败态后继续
pub struct ProfitSharingService {
    rb: Arc<RBatis>,
    config: ProfitSharingConfig,
}

impl ProfitSharingService {
    pub fn new(rb: Arc<RBatis>, config: ProfitSharingConfig) -> Self {
        Self { rb, config }
    }

    /// 计算某项目某周期的分润
    ///
    /// 返回生成的分润记录数；净收益不为正时不产生记录
    pub async fn calculate(&self, project_id: i64, period: &str) -> AppResult<usize> {
        if !period_util::is_valid_period(period) {
            return Err(AppError::ValidationError(format!("非法结算周期: {}", period)));
        }

        let mut tx = begin_tx(&self.rb).await?;

        // 锁项目行，串行化同一项目的并发计算，幂等检查不会看到过期快照
        let project = AppCrowdfundingProject::select_by_id_for_update(&mut tx, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("众筹项目不存在: id={}", project_id)))?;

        let existing =
            AppProfitSharing::select_by_project_and_period(&mut tx, project_id, period).await?;
        if !existing.is_empty() {
            return Err(AppError::AlreadyCalculated(format!(
                "项目 {} 周期 {} 已存在 {} 条分润记录",
                project_id,
                period,
                existing.len()
            )));
        }

        if project.status != ProjectStatus::Success.get_code() {
            return Err(AppError::InvalidState(format!(
                "项目 {} 未众筹成功，无法分润",
                project_id
            )));
        }
        if project.total_shares <= 0 {
            return Err(AppError::InvalidState(format!(
                "项目 {} 总份额异常: {}",
                project_id, project.total_shares
            )));
        }

        let income =
            AppProjectPeriodIncome::select_by_project_and_period(&mut tx, project_id, period)
                .await?
                .ok_or_else(|| {
                    AppError::NotFound(format!(
                        "项目 {} 周期 {} 收支未录入",
                        project_id, period
                    ))
                })?;

        let (_platform_fee, total_cost) = compute_cost(
            income.total_income,
            income.insurance_fee,
            income.maintenance_fee,
            income.cleaning_fee,
            self.config.platform_fee_rate,
        );
        let net_income = income.total_income - total_cost;
        if net_income <= Decimal::ZERO {
            log::info!(
                "项目 {} 周期 {} 净收益 {} 不为正，不产生分润",
                project_id,
                period,
                net_income
            );
            return Ok(0);
        }

        let per_share = per_share_amount(net_income, project.total_shares);
        if per_share <= Decimal::ZERO {
            log::info!(
                "项目 {} 周期 {} 每份分润不足一分钱，不产生分润",
                project_id,
                period
            );
            return Ok(0);
        }

        let shares = AppCrowdfundingShare::select_by_project_and_status(
            &mut tx,
            project_id,
            ShareStatus::Active.get_code(),
        )
        .await?;

        let now = DateTime::now();
        let mut created = 0;
        for share in &shares {
            let row = AppProfitSharing {
                id: None,
                project_id,
                period: period.to_string(),
                share_id: share.id.unwrap_or_default(),
                user_id: share.user_id,
                share_count: share.share_count,
                total_income: income.total_income,
                total_cost,
                net_income,
                per_share_amount: per_share,
                profit_sharing_amount: per_share * Decimal::from(share.share_count),
                status: ProfitSharingStatus::Pending.get_code(),
                paid_time: None,
                remark: None,
                create_time: Some(now.clone()),
                update_time: Some(now.clone()),
            };
            AppProfitSharing::insert(&mut tx, &row).await?;
            created += 1;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!(
            "分润计算完成: 项目={} 周期={} 净收益={} 每份={} 记录数={}",
            project_id,
            period,
            net_income,
            per_share,
            created
        );
        Ok(created)
    }

    /// 发放某周期全部待发放分润
    ///
    /// 返回 (发放成功数, 失败数)；失败行置为失败态并继续处理后续行
    pub async fn distribute(&self, period: &str) -> AppResult<(usize, usize)> {
        if !period_util::is_valid_period(period) {
            return Err(AppError::ValidationError(format!("非法结算周期: {}", period)));
        }

        let rows = AppProfitSharing::select_by_period_and_status(
            self.rb.as_ref(),
            period,
            ProfitSharingStatus::Pending.get_code(),
        )
        .await?;

        let mut paid = 0;
        let mut failed = 0;
        for row in &rows {
            let Some(row_id) = row.id else { continue };
            match self.pay_row(row_id).await {
                Ok(true) => paid += 1,
                Ok(false) => {}
                Err(e) => {
                    log::error!("分润发放失败 id={}: {}", row_id, e);
                    self.mark_failed(row_id, &e.to_string()).await;
                    failed += 1;
                }
            }
        }

        log::info!("分润发放完成: 周期={} 成功={} 失败={}", period, paid, failed);
        Ok((paid, failed))
    }

    /// 发放单行：钱包入账与状态流转在同一事务内
    async fn pay_row(&self, row_id: i64) -> AppResult<bool> {
        let mut tx = begin_tx(&self.rb).await?;

        let mut row = AppProfitSharing::select_by_id_for_update(&mut tx, row_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("分润记录不存在: id={}", row_id)))?;
        if row.status != ProfitSharingStatus::Pending.get_code() {
            return Ok(false);
        }

        WalletService::adjust_balance_tx(
            &mut tx,
            row.user_id,
            row.profit_sharing_amount,
            &format!("众筹分润 项目{} 周期{}", row.project_id, row.period),
            self.config.system_operator_id,
            Some(row_id),
        )
        .await?;

        let now = DateTime::now();
        row.status = ProfitSharingStatus::Paid.get_code();
        row.paid_time = Some(now.clone());
        row.update_time = Some(now);
        let where_map = rbs::value! { "id": row_id };
        AppProfitSharing::update_by_map(&mut tx, &row, where_map).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(true)
    }

    /// 把发放失败的行置为失败态（独立事务，原发放事务已回滚）
    async fn mark_failed(&self, row_id: i64, reason: &str) {
        let result: AppResult<()> = async {
            let mut tx = begin_tx(&self.rb).await?;
            let Some(mut row) = AppProfitSharing::select_by_id_for_update(&mut tx, row_id).await?
            else {
                return Ok(());
            };
            if row.status != ProfitSharingStatus::Pending.get_code() {
                return Ok(());
            }
            row.status = ProfitSharingStatus::Failed.get_code();
            row.remark = Some(reason.to_string());
            row.update_time = Some(DateTime::now());
            let where_map = rbs::value! { "id": row_id };
            AppProfitSharing::update_by_map(&mut tx, &row, where_map).await?;
            tx.commit()
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
            Ok(())
        }
        .await;

        if let Err(e) = result {
            log::error!("标记分润失败态未成功 id={}: {}", row_id, e);
        }
    }
}

/// 计算平台服务费与当期总成本
fn compute_cost(
    total_income: Decimal,
    insurance_fee: Decimal,
    maintenance_fee: Decimal,
    cleaning_fee: Decimal,
    platform_fee_rate: Decimal,
) -> (Decimal, Decimal) {
    let platform_fee = (total_income * platform_fee_rate)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let total_cost = insurance_fee + maintenance_fee + cleaning_fee + platform_fee;
    (platform_fee, total_cost)
}

/// 每份分润
///
/// 向下取整到分，保证当期发放总额不超过净收益
fn per_share_amount(net_income: Decimal, total_shares: i64) -> Decimal {
    (net_income / Decimal::from(total_shares)).round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_compute_cost() {
        // 平台服务费默认按总收入 5% 计
        let (platform_fee, total_cost) =
            compute_cost(d(10000), d(300), d(200), d(100), Decimal::new(5, 2));
        assert_eq!(platform_fee, d(500));
        assert_eq!(total_cost, d(1100));
    }

    #[test]
    fn test_per_share_scenario() {
        // 100 份、当期净收益 10000 -> 每份 100，持有 30 份应得 3000
        let per_share = per_share_amount(d(10000), 100);
        assert_eq!(per_share, d(100));
        assert_eq!(per_share * d(30), d(3000));
    }

    #[test]
    fn test_per_share_rounds_down() {
        // 100 / 3 = 33.33...，向下取整到分
        let per_share = per_share_amount(d(100), 3);
        assert_eq!(per_share, Decimal::new(3333, 2));
        // 三份合计不超过净收益
        assert!(per_share * d(3) <= d(100));
    }

    #[test]
    fn test_net_income_not_positive() {
        let (_, total_cost) = compute_cost(d(1000), d(600), d(300), d(100), Decimal::new(5, 2));
        // 成本 1050 > 收入 1000，净收益为负，调用方不产生分润记录
        assert!(d(1000) - total_cost < Decimal::ZERO);
    }
}
