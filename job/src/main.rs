use std::sync::Arc;

use common::AppConfig;
use settlement::{CrowdfundingService, PointsService, ProfitSharingService};
use tokio_cron_scheduler::{Job, JobScheduler};

mod jobs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 嵌入配置文件（编译时加载）
    const DEFAULT_CONFIG: &str = include_str!("../config.toml");

    let config = AppConfig::from_file_or_embedded("job/config", DEFAULT_CONFIG)
        .or_else(|_| AppConfig::from_env())
        .expect("配置加载失败");

    // 初始化日志（使用配置的日志级别）
    std::env::set_var("RUST_LOG", &config.log.level);
    common::init_logger();

    log::info!("启动结算定时任务服务...");

    // 初始化数据库连接
    let db_config = common::DbConfig::new(
        config.database.url.clone(),
        config.database.max_connections as u64,
    );
    common::init_db(&db_config)
        .await
        .expect("数据库连接池初始化失败");
    if let Err(e) = common::test_db_connection().await {
        log::error!("数据库连接测试失败: {}", e);
    }

    let rb = Arc::new(common::get_db().clone());

    // 组装服务
    let points_service = Arc::new(PointsService::new(rb.clone()));
    let crowdfunding_service = Arc::new(CrowdfundingService::new(rb.clone()));
    let profit_sharing_service = Arc::new(ProfitSharingService::new(
        rb.clone(),
        config.profit_sharing.clone(),
    ));

    let mut sched = JobScheduler::new().await?;

    // 每日 02:00 积分过期扫描
    {
        let svc = points_service.clone();
        sched
            .add(Job::new_async("0 0 2 * * *", move |_uuid, _lock| {
                let svc = svc.clone();
                Box::pin(async move {
                    jobs::points_job::run_expire(&svc).await;
                })
            })?)
            .await?;
    }

    // 每年 1 月 1 日 03:00 积分年度清零
    {
        let svc = points_service.clone();
        sched
            .add(Job::new_async("0 0 3 1 1 *", move |_uuid, _lock| {
                let svc = svc.clone();
                Box::pin(async move {
                    jobs::points_job::run_clear(&svc).await;
                })
            })?)
            .await?;
    }

    // 每月 1 日 04:00 计算上月分润
    {
        let rb = rb.clone();
        let svc = profit_sharing_service.clone();
        sched
            .add(Job::new_async("0 0 4 1 * *", move |_uuid, _lock| {
                let rb = rb.clone();
                let svc = svc.clone();
                Box::pin(async move {
                    jobs::profit_sharing_job::run_calculate(&rb, &svc).await;
                })
            })?)
            .await?;
    }

    // 每月 1 日 05:00 发放上月分润
    {
        let svc = profit_sharing_service.clone();
        sched
            .add(Job::new_async("0 0 5 1 * *", move |_uuid, _lock| {
                let svc = svc.clone();
                Box::pin(async move {
                    jobs::profit_sharing_job::run_distribute(&svc).await;
                })
            })?)
            .await?;
    }

    // 每小时整点巡检众筹项目状态
    {
        let svc = crowdfunding_service.clone();
        sched
            .add(Job::new_async("0 0 * * * *", move |_uuid, _lock| {
                let svc = svc.clone();
                Box::pin(async move {
                    jobs::crowdfunding_job::run_sweep(&svc).await;
                })
            })?)
            .await?;
    }

    sched.start().await?;
    log::info!("定时任务已注册，服务运行中");

    tokio::signal::ctrl_c().await?;
    log::info!("收到退出信号，正在关闭服务...");
    sched.shutdown().await?;
    Ok(())
}
