use settlement::PointsService;

/// 积分过期扫描
pub async fn run_expire(service: &PointsService) {
    match service.expire_points().await {
        Ok(count) => log::info!("积分过期任务完成，处理账户数: {}", count),
        Err(e) => log::error!("积分过期任务执行失败: {}", e),
    }
}

/// 积分年度清零
pub async fn run_clear(service: &PointsService) {
    match service.clear_points().await {
        Ok(count) => log::info!("积分年度清零任务完成，处理账户数: {}", count),
        Err(e) => log::error!("积分年度清零任务执行失败: {}", e),
    }
}
