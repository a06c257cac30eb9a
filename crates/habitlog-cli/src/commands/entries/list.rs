use habitlog_core::storage::EntryFilter;
use habitlog_core::StorageEngine;

use crate::app::AppContext;
use crate::cli::ListArgs;
use crate::constants::DEFAULT_LIST_LIMIT;
use crate::helpers::parsing::{parse_day, parse_output_format, parse_window, window_start};
use crate::output::print_entry_list;

pub fn handle_list(ctx: &AppContext, args: &ListArgs) -> anyhow::Result<()> {
    let format = parse_output_format(args.format.as_deref())?;
    let today = ctx.today()?;

    let mut filter = EntryFilter::new();
    if let Some(ref habit) = args.habit {
        filter = filter.habit(habit.clone());
    }
    if let Some(ref last) = args.last {
        filter = filter.since(window_start(today, parse_window(last)?)?);
    }
    if let Some(ref since) = args.since {
        filter = filter.since(parse_day(since, today)?);
    }
    if let Some(ref until) = args.until {
        filter = filter.until(parse_day(until, today)?);
    }
    if let Some(limit) = args.limit {
        filter = filter.limit(limit);
    } else if args.last.is_none() && args.since.is_none() && args.until.is_none() {
        filter = filter.limit(DEFAULT_LIST_LIMIT);
    }

    let storage = ctx.open_storage()?;
    let entries = storage.list_entries(&filter)?;
    let settings = storage.settings()?;
    print_entry_list(&entries, &settings, args.json, format, ctx)
}
