use common::enums::ProjectStatus;
use common::utils::period_util;
use common::AppError;
use orm::entities::AppCrowdfundingProject;
use rbatis::RBatis;
use settlement::ProfitSharingService;

/// 计算上月分润
///
/// 遍历全部众筹成功项目；幂等键为 项目+周期，重复触发自然跳过
pub async fn run_calculate(rb: &RBatis, service: &ProfitSharingService) {
    let period = period_util::previous_period();

    let projects =
        match AppCrowdfundingProject::select_by_status(rb, ProjectStatus::Success.get_code()).await
        {
            Ok(projects) => projects,
            Err(e) => {
                log::error!("查询众筹成功项目失败: {}", e);
                return;
            }
        };

    for project in &projects {
        let Some(project_id) = project.id else { continue };
        match service.calculate(project_id, &period).await {
            Ok(count) => {
                log::info!("项目 {} 周期 {} 生成分润记录 {} 条", project_id, period, count)
            }
            Err(AppError::AlreadyCalculated(_)) => {
                log::debug!("项目 {} 周期 {} 已计算，跳过", project_id, period)
            }
            Err(AppError::NotFound(msg)) => {
                log::warn!("项目 {} 周期 {} 跳过: {}", project_id, period, msg)
            }
            Err(e) => log::error!("项目 {} 周期 {} 分润计算失败: {}", project_id, period, e),
        }
    }
}

/// 发放上月分润
pub async fn run_distribute(service: &ProfitSharingService) {
    let period = period_util::previous_period();
    match service.distribute(&period).await {
        Ok((paid, failed)) => {
            log::info!("周期 {} 分润发放完成: 成功 {} 失败 {}", period, paid, failed)
        }
        Err(e) => log::error!("周期 {} 分润发放执行失败: {}", period, e),
    }
}
