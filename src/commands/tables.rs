// 表格类命令

use anyhow::bail;
use rollcall::data::{QueryCache, QueryDescriptor};
use rollcall::services::roster::{
    attendance_columns, event_columns, member_columns, member_status_columns, semester_columns,
};
use rollcall::shell::{ShellContent, TableShell};
use rollcall::table::{render_to_string, ColumnDef, SortDirection, TableState};
use rollcall::AppError;

use super::Context;
use crate::cli::TableArgs;

pub async fn members(ctx: &Context, args: &TableArgs) -> anyhow::Result<String> {
    let descriptor = ctx.api.members();
    show_table(&ctx.cache, &descriptor, member_columns(), args, ctx.page_size).await
}

pub async fn events(ctx: &Context, args: &TableArgs) -> anyhow::Result<String> {
    let descriptor = ctx.api.events();
    show_table(&ctx.cache, &descriptor, event_columns(), args, ctx.page_size).await
}

pub async fn attendance(ctx: &Context, event_id: i64, args: &TableArgs) -> anyhow::Result<String> {
    let descriptor = ctx.api.event_attendance(event_id);
    show_table(&ctx.cache, &descriptor, attendance_columns(), args, ctx.page_size).await
}

pub async fn actives(ctx: &Context, semester: &str, args: &TableArgs) -> anyhow::Result<String> {
    let descriptor = ctx.api.semester_statuses(semester);
    show_table(&ctx.cache, &descriptor, member_status_columns(), args, ctx.page_size).await
}

pub async fn semesters(ctx: &Context, args: &TableArgs) -> anyhow::Result<String> {
    let descriptor = ctx.api.semesters();
    show_table(&ctx.cache, &descriptor, semester_columns(), args, ctx.page_size).await
}

/// 拉取数据并渲染一页表格
async fn show_table<R>(
    cache: &QueryCache,
    descriptor: &QueryDescriptor<Vec<R>>,
    columns: Vec<ColumnDef<R>>,
    args: &TableArgs,
    default_page_size: usize,
) -> anyhow::Result<String>
where
    R: Send + Sync + 'static,
{
    if args.page == 0 {
        bail!("页码从 1 开始");
    }

    let state = TableState::new(args.page_size.unwrap_or(default_page_size));
    let mut shell = TableShell::new(cache, descriptor, columns, state);
    apply_table_args(&mut shell, args)?;

    let frame = shell.settled().await;
    if let ShellContent::Failed(error) = shell.view(&frame) {
        tracing::warn!(key = %descriptor.key(), error = %error, "查询失败");
        return Err(AppError::from(error).into());
    }
    if args.page > 1 && !shell.set_page(args.page - 1) {
        bail!("页码 {} 超出范围", args.page);
    }

    match shell.view(&frame) {
        ShellContent::Table(view) => Ok(render_to_string(&view)),
        ShellContent::Failed(error) => Err(AppError::from(error).into()),
    }
}

/// 过滤、排序与隐藏列；列 id 无效时报错
fn apply_table_args<R>(shell: &mut TableShell<R>, args: &TableArgs) -> anyhow::Result<()>
where
    R: Send + Sync + 'static,
{
    if let Some(filter) = &args.filter {
        shell.set_global_filter(filter.clone());
    }

    if let Some(column) = &args.sort {
        let direction = if args.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        if !shell.set_sort(column, direction) {
            bail!("列 {column} 不存在或不可排序");
        }
    }

    for column in &args.hide {
        if !shell.set_column_visibility(column, false) {
            bail!("列 {column} 不存在或不可隐藏");
        }
    }
    Ok(())
}
