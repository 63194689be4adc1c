use rollcall_cache::{Fetcher, QueryObserver, QueryOptions, fetcher, keys, stale_times};
use rollcall_core::ClientError;
use rollcall_models::{DashboardStats, Role};

use super::DashboardService;
use crate::state::AppContext;

const OPTIONS: QueryOptions = QueryOptions::stale(stale_times::DASHBOARD)
    .with_refetch_interval(stale_times::DASHBOARD_POLL);

fn stats_fetcher(ctx: &AppContext) -> Fetcher {
    let api = ctx.api.clone();
    fetcher(move || {
        let api = api.clone();
        async move { DashboardService::dashboard_stats(&api).await }
    })
}

fn current_role(ctx: &AppContext) -> Result<Role, ClientError> {
    ctx.session.state().role().ok_or(ClientError::AuthExpired)
}

/// Dashboard summary for the signed-in user's role.
pub async fn stats(ctx: &AppContext) -> Result<DashboardStats, ClientError> {
    let key = keys::dashboard::stats(current_role(ctx)?);
    ctx.cache.fetch(&key, OPTIONS, stats_fetcher(ctx)).await
}

/// Observed summary, refreshed every five minutes while watched.
pub fn observe_stats(ctx: &AppContext) -> Result<QueryObserver<DashboardStats>, ClientError> {
    let key = keys::dashboard::stats(current_role(ctx)?);
    Ok(ctx.cache.observe(&key, OPTIONS, stats_fetcher(ctx)))
}
