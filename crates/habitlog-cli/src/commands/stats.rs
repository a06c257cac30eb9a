use habitlog_core::engine::streak::WEEKLY_HABIT_DAY_THRESHOLD;
use habitlog_core::{compute_stats, EntryFilter, Stats, StorageEngine};

use crate::app::AppContext;
use crate::cli::StatsArgs;
use crate::helpers::parsing::parse_output_format;
use crate::ui::format::{format_day, format_rate, progress};
use crate::ui::theme::check_mark;
use crate::ui::{
    badge, blank_line, header, kv, print, section, table, Badge, Column, UiContext,
};

pub fn handle_stats(ctx: &AppContext, args: &StatsArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let now = ctx.now(args.now.as_deref())?;

    let storage = ctx.open_storage()?;
    let entries = storage.list_entries(&EntryFilter::new())?;
    let settings = storage.settings()?;
    let stats = compute_stats(&entries, &settings, now);

    let ui_ctx = ctx.ui_context(args.json, format);
    if ui_ctx.mode.is_json() {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        let month = stats.this_month.month.to_string();
        print(&ui_ctx, &header(&ui_ctx, "stats", Some(&month)));
        blank_line(&ui_ctx);
    }
    render(&ui_ctx, &stats);
    if ui_ctx.mode.is_pretty() && !ctx.quiet() {
        blank_line(&ui_ctx);
        print_nudges(&ui_ctx, &stats);
    }
    Ok(())
}

fn print_nudges(ui_ctx: &UiContext, stats: &Stats) {
    let week = &stats.this_week;
    if !week.met {
        let missing = WEEKLY_HABIT_DAY_THRESHOLD.saturating_sub(week.habit_days);
        let message = format!(
            "{} more habit day{} this week for the {}-point reward",
            missing,
            if missing == 1 { "" } else { "s" },
            stats.points.weekly_reward_base
        );
        print(ui_ctx, &badge(ui_ctx, Badge::Warn, &message));
    }
    if stats.interpersonal.unlocked {
        print(
            ui_ctx,
            &badge(ui_ctx, Badge::Info, "Interpersonal goals are unlocked"),
        );
    }
}

fn render(ui_ctx: &UiContext, stats: &Stats) {
    let pretty = ui_ctx.mode.is_pretty();
    let mark = |met: bool| check_mark(met, ui_ctx.unicode).to_string();

    let week = &stats.this_week;
    print(ui_ctx, &section(ui_ctx, "This week"));
    print(ui_ctx, &kv(ui_ctx, "Week start", &format_day(week.week_start, pretty)));
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Habit days",
            &progress(week.habit_days, WEEKLY_HABIT_DAY_THRESHOLD),
        ),
    );
    print(ui_ctx, &kv(ui_ctx, "Entry days", &week.entry_days.to_string()));
    print(ui_ctx, &kv(ui_ctx, "Met", &mark(week.met)));
    blank_line(ui_ctx);

    let month = &stats.this_month;
    print(ui_ctx, &section(ui_ctx, "This month"));
    print(ui_ctx, &kv(ui_ctx, "Month", &month.month.to_string()));
    print(ui_ctx, &kv(ui_ctx, "Entry days", &month.entry_days.to_string()));
    print(ui_ctx, &kv(ui_ctx, "Habit days", &month.habit_days.to_string()));
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Met weeks",
            &progress(month.met_weeks, month.weeks.len() as u32),
        ),
    );
    print(ui_ctx, &kv(ui_ctx, "All weeks met", &mark(month.all_weeks_met)));
    if pretty && !month.weeks.is_empty() {
        let rows: Vec<Vec<String>> = month
            .weeks
            .iter()
            .map(|w| {
                vec![
                    format_day(w.week_start, true),
                    w.entry_days.to_string(),
                    progress(w.habit_days, WEEKLY_HABIT_DAY_THRESHOLD),
                    mark(w.met),
                ]
            })
            .collect();
        let columns = [
            Column::new("WEEK"),
            Column::new("ENTRIES"),
            Column::new("HABITS"),
            Column::new("MET"),
        ];
        print(ui_ctx, &table(ui_ctx, &columns, &rows));
    }
    blank_line(ui_ctx);

    let points = &stats.points;
    print(ui_ctx, &section(ui_ctx, "Points"));
    print(ui_ctx, &kv(ui_ctx, "Total", &points.total.to_string()));
    print(
        ui_ctx,
        &kv(ui_ctx, "Qualifying weeks", &points.qualifying_weeks.to_string()),
    );
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Next weekly reward",
            &points.next_period_weekly_reward.to_string(),
        ),
    );
    blank_line(ui_ctx);

    let unlock = &stats.interpersonal;
    print(ui_ctx, &section(ui_ctx, "Interpersonal"));
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Met weeks",
            &format!(
                "{} (need {})",
                progress(unlock.met_weeks, unlock.total_weeks),
                unlock.required_weeks
            ),
        ),
    );
    print(ui_ctx, &kv(ui_ctx, "Unlocked", &mark(unlock.unlocked)));
    blank_line(ui_ctx);

    let projection = &stats.projection;
    print(ui_ctx, &section(ui_ctx, "Projection"));
    print(
        ui_ctx,
        &kv(ui_ctx, "Savings ratio", &projection.savings_ratio.to_string()),
    );
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Bonus days",
            &progress(projection.bonus_days, projection.bonus_threshold),
        ),
    );
    print(ui_ctx, &kv(ui_ctx, "Bonus", &mark(projection.bonus_active)));
    print(ui_ctx, &kv(ui_ctx, "Gain rate", &format_rate(projection.gain_rate)));
    print(
        ui_ctx,
        &kv(
            ui_ctx,
            "Projected month end",
            &projection.projected_month_end.to_string(),
        ),
    );
}
