// 删除类命令：先按 id 找到记录，再走删除确认框

use std::sync::Arc;

use rollcall::data::{QueryCache, QueryDescriptor};
use rollcall::services::roster::{EventActions, MemberActions, MutationReply};
use rollcall::shell::{DeleteAction, DeleteDialog, LogNotifier, Notification, SubmitOutcome};
use rollcall::AppError;

use super::Context;

pub async fn delete_member(ctx: &Context, id: i64, yes: bool) -> anyhow::Result<String> {
    let member = find_record(&ctx.cache, &ctx.api.members(), |m| m.member_id == id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("成员 {id}")))?;
    tracing::debug!(member_id = id, name = %member.full_name(), "准备删除成员");

    let dialog =
        MemberActions::new(ctx.api.clone()).delete(&member, &ctx.cache, Arc::new(LogNotifier));
    confirm(dialog, yes).await
}

pub async fn delete_event(ctx: &Context, id: i64, yes: bool) -> anyhow::Result<String> {
    let event = find_record(&ctx.cache, &ctx.api.events(), |e| e.event_id == id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("活动 {id}")))?;
    tracing::debug!(event_id = id, name = %event.event_name, "准备删除活动");

    let dialog =
        EventActions::new(ctx.api.clone()).delete(&event, &ctx.cache, Arc::new(LogNotifier));
    confirm(dialog, yes).await
}

/// 拉取列表并按条件查找；观察者在返回前释放
async fn find_record<R, F>(
    cache: &QueryCache,
    descriptor: &QueryDescriptor<Vec<R>>,
    predicate: F,
) -> Result<Option<R>, AppError>
where
    R: Clone + Send + Sync + 'static,
    F: Fn(&R) -> bool,
{
    let mut observer = cache.observe(descriptor);
    let state = observer.settled().await;
    if let Some(error) = state.error {
        return Err(AppError::from(error));
    }
    Ok(state
        .data
        .as_deref()
        .and_then(|rows| rows.iter().find(|row| predicate(row)).cloned()))
}

/// 未加 `--yes` 时只打印确认信息
async fn confirm(dialog: DeleteDialog<MutationReply>, yes: bool) -> anyhow::Result<String> {
    if !yes {
        return Ok(format!(
            "{}\n{}\n使用 --yes 确认删除",
            dialog.title(),
            dialog.description()
        ));
    }

    match dialog.confirm().await {
        SubmitOutcome::Saved(_) => Ok(Notification::row_deleted().description),
        SubmitOutcome::Failed(error) => Err(AppError::from(error).into()),
        SubmitOutcome::Busy | SubmitOutcome::Invalid(_) => {
            anyhow::bail!("删除请求未发出")
        }
    }
}
