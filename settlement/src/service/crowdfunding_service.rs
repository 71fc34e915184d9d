use std::sync::Arc;

use common::constants::related_types;
use common::enums::{PointsSource, ProjectStatus, ShareStatus};
use common::utils::{date_util, snowflake};
use common::{AppError, AppResult};
use orm::entities::{AppCrowdfundingProject, AppCrowdfundingShare};
use rbatis::rbdc::datetime::DateTime;
use rbatis::RBatis;
use rust_decimal::Decimal;

use super::begin_tx;
use super::points_service::PointsService;
use super::wallet_service::WalletService;

/// 众筹结算服务
///
/// 认购在一个事务内完成 扣款 + 份额建档 + 项目计数 + 积分入账，
/// 任一步失败整体回滚，不存在可观测的半截认购
pub struct CrowdfundingService {
    rb: Arc<RBatis>,
}

impl CrowdfundingService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 认购项目份额
    pub async fn purchase_shares(
        &self,
        user_id: i64,
        project_id: i64,
        share_count: i64,
    ) -> AppResult<AppCrowdfundingShare> {
        if share_count <= 0 {
            return Err(AppError::ValidationError(format!(
                "认购份数必须为正数: {}",
                share_count
            )));
        }

        let mut tx = begin_tx(&self.rb).await?;

        let mut project = AppCrowdfundingProject::select_by_id_for_update(&mut tx, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("众筹项目不存在: id={}", project_id)))?;

        let status = ProjectStatus::from_code(project.status)
            .ok_or_else(|| AppError::InvalidState(format!("未知项目状态: {}", project.status)))?;
        if !status.can_purchase() {
            return Err(AppError::InvalidState(format!(
                "项目 {} 当前状态为 {}，不可认购",
                project.name,
                status.description()
            )));
        }
        if let Some(end) = &project.end_time {
            if date_util::is_past(end) {
                return Err(AppError::InvalidState(format!(
                    "项目 {} 认购已截止",
                    project.name
                )));
            }
        }
        if share_count > project.remaining_shares() {
            return Err(AppError::ValidationError(format!(
                "剩余份额不足: 剩余 {} 认购 {}",
                project.remaining_shares(),
                share_count
            )));
        }

        let price = project.share_price * Decimal::from(share_count);
        let now = DateTime::now();

        // 份额建档
        let share_no = snowflake::generate_id_string();
        let share = AppCrowdfundingShare {
            id: None,
            share_no: Some(share_no.clone()),
            project_id,
            user_id,
            share_count,
            unit_price: project.share_price,
            total_amount: price,
            status: ShareStatus::Active.get_code(),
            purchase_time: Some(now.clone()),
            create_time: Some(now.clone()),
            update_time: Some(now),
        };
        AppCrowdfundingShare::insert(&mut tx, &share).await?;
        let share = AppCrowdfundingShare::select_by_share_no(&mut tx, &share_no)
            .await?
            .ok_or_else(|| AppError::DatabaseError(format!("份额创建后读取失败: {}", share_no)))?;
        let share_id = share.id.unwrap_or_default();

        // 钱包扣款
        WalletService::consume_tx(
            &mut tx,
            user_id,
            price,
            share_id,
            related_types::CROWDFUNDING_SHARE,
            &format!("认购 {} {} 份", project.name, share_count),
        )
        .await?;

        // 项目计数，售罄即众筹成功
        project.sold_shares += share_count;
        project.raised_amount += price;
        if project.sold_shares >= project.total_shares {
            project.status = ProjectStatus::Success.get_code();
        }
        project.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "id": project_id };
        AppCrowdfundingProject::update_by_map(&mut tx, &project, where_map).await?;

        // 认购积分
        PointsService::earn_points_tx(
            &mut tx,
            user_id,
            price,
            PointsSource::Purchase,
            Some(share_id),
            None,
        )
        .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        log::info!(
            "认购完成: user_id={} 项目={} 份数={} 金额={}",
            user_id,
            project_id,
            share_count,
            price
        );
        Ok(share)
    }

    /// 项目状态巡检（小时任务）
    ///
    /// 返回 (开售数, 成功数, 失败数)
    pub async fn check_project_status(&self) -> AppResult<(usize, usize, usize)> {
        let mut opened = 0;
        let mut succeeded = 0;
        let mut failed = 0;

        // 待开售 -> 认购中
        let pending = AppCrowdfundingProject::select_by_status(
            self.rb.as_ref(),
            ProjectStatus::Pending.get_code(),
        )
        .await?;
        for project in &pending {
            let Some(id) = project.id else { continue };
            match self.open_project(id).await {
                Ok(true) => opened += 1,
                Ok(false) => {}
                Err(e) => log::error!("项目开售处理失败 id={}: {}", id, e),
            }
        }

        // 认购中到期 -> 成功 | 失败（失败项目逐份额退款）
        let funding = AppCrowdfundingProject::select_by_status(
            self.rb.as_ref(),
            ProjectStatus::Funding.get_code(),
        )
        .await?;
        for project in &funding {
            let Some(id) = project.id else { continue };
            match self.settle_ended_project(id).await {
                Ok(Some(ProjectStatus::Success)) => succeeded += 1,
                Ok(Some(ProjectStatus::Failed)) => {
                    failed += 1;
                    let refunded = self.refund_failed_project(id).await;
                    log::info!("众筹失败项目 id={} 已退款份额数: {}", id, refunded);
                }
                Ok(_) => {}
                Err(e) => log::error!("项目截止结算失败 id={}: {}", id, e),
            }
        }

        log::info!(
            "项目巡检完成: 开售 {} 成功 {} 失败 {}",
            opened,
            succeeded,
            failed
        );
        Ok((opened, succeeded, failed))
    }

    /// 到点开售
    async fn open_project(&self, project_id: i64) -> AppResult<bool> {
        let mut tx = begin_tx(&self.rb).await?;

        let Some(mut project) =
            AppCrowdfundingProject::select_by_id_for_update(&mut tx, project_id).await?
        else {
            return Ok(false);
        };
        if project.status != ProjectStatus::Pending.get_code() {
            return Ok(false);
        }
        let started = project
            .start_time
            .as_ref()
            .map(date_util::is_past)
            .unwrap_or(false);
        if !started {
            return Ok(false);
        }

        project.status = ProjectStatus::Funding.get_code();
        project.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "id": project_id };
        AppCrowdfundingProject::update_by_map(&mut tx, &project, where_map).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(true)
    }

    /// 截止结算：售罄成功，否则失败
    async fn settle_ended_project(&self, project_id: i64) -> AppResult<Option<ProjectStatus>> {
        let mut tx = begin_tx(&self.rb).await?;

        let Some(mut project) =
            AppCrowdfundingProject::select_by_id_for_update(&mut tx, project_id).await?
        else {
            return Ok(None);
        };
        if project.status != ProjectStatus::Funding.get_code() {
            return Ok(None);
        }
        let ended = project
            .end_time
            .as_ref()
            .map(date_util::is_past)
            .unwrap_or(false);
        if !ended {
            return Ok(None);
        }

        let next = if project.sold_shares >= project.total_shares {
            ProjectStatus::Success
        } else {
            ProjectStatus::Failed
        };
        project.status = next.get_code();
        project.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "id": project_id };
        AppCrowdfundingProject::update_by_map(&mut tx, &project, where_map).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(Some(next))
    }

    /// 失败项目退款
    ///
    /// 逐份额独立事务：退回认购金额并把份额置为已赎回，
    /// 单个份额失败不阻塞其余份额
    async fn refund_failed_project(&self, project_id: i64) -> usize {
        let shares = match AppCrowdfundingShare::select_by_project_and_status(
            self.rb.as_ref(),
            project_id,
            ShareStatus::Active.get_code(),
        )
        .await
        {
            Ok(shares) => shares,
            Err(e) => {
                log::error!("查询待退款份额失败 project_id={}: {}", project_id, e);
                return 0;
            }
        };

        let mut refunded = 0;
        for share in &shares {
            let Some(share_id) = share.id else { continue };
            match self.refund_share(share_id).await {
                Ok(true) => refunded += 1,
                Ok(false) => {}
                Err(e) => log::error!("份额退款失败 share_id={}: {}", share_id, e),
            }
        }
        refunded
    }

    async fn refund_share(&self, share_id: i64) -> AppResult<bool> {
        let mut tx = begin_tx(&self.rb).await?;

        let Some(mut share) =
            AppCrowdfundingShare::select_by_id_for_update(&mut tx, share_id).await?
        else {
            return Ok(false);
        };
        if share.status != ShareStatus::Active.get_code() {
            return Ok(false);
        }

        WalletService::refund_tx(
            &mut tx,
            share.user_id,
            share.total_amount,
            share_id,
            related_types::CROWDFUNDING_SHARE,
            "众筹失败退款",
        )
        .await?;

        share.status = ShareStatus::Redeemed.get_code();
        share.update_time = Some(DateTime::now());
        let where_map = rbs::value! { "id": share_id };
        AppCrowdfundingShare::update_by_map(&mut tx, &share, where_map).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(true)
    }
}
