use settlement::CrowdfundingService;

/// 众筹项目状态巡检
pub async fn run_sweep(service: &CrowdfundingService) {
    match service.check_project_status().await {
        Ok((opened, succeeded, failed)) => log::info!(
            "项目巡检完成: 开售 {} 成功 {} 失败 {}",
            opened,
            succeeded,
            failed
        ),
        Err(e) => log::error!("项目巡检执行失败: {}", e),
    }
}
