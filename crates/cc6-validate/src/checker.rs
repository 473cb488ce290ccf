//! The configured checker.
//!
//! Tables are loaded once; every file is then checked against them. The
//! host either calls [`Checker::run_all`] or the individual `check_*`
//! methods with a [`FileContext`] from [`Checker::setup`].

use std::path::Path;

use anyhow::Context;
use cc6_core::{CalendarClock, CfClock};
use cc6_model::{CheckResult, CheckerOptions, FileReport};
use cc6_standards::{TableSet, resolve_tables_root};

use crate::checks::{
    compression, format, global_attrs, missing_value, time, variable, variable_definition,
};
use crate::context::FileContext;
use crate::dataset::Dataset;

/// Checks files against one set of CORDEX-CMIP6 tables.
#[derive(Debug, Clone)]
pub struct Checker<C: CalendarClock = CfClock> {
    tables: TableSet,
    options: CheckerOptions,
    clock: C,
}

impl Checker {
    pub fn new(tables: TableSet, options: CheckerOptions) -> Self {
        Self {
            tables,
            options,
            clock: CfClock,
        }
    }

    /// Load the tables named by `options` (or the environment).
    pub fn from_options(options: CheckerOptions) -> anyhow::Result<Self> {
        let root = resolve_tables_root(&options);
        let tables = TableSet::load(&root)
            .with_context(|| format!("failed to load CORDEX-CMIP6 tables from {}", root.display()))?;
        Ok(Self::new(tables, options))
    }

    /// Load the tables from `dir` with default options.
    pub fn from_tables_dir(dir: &Path) -> anyhow::Result<Self> {
        Self::from_options(CheckerOptions::default().with_tables_path(dir))
    }
}

impl<C: CalendarClock> Checker<C> {
    /// Swap the calendar implementation.
    pub fn with_clock<K: CalendarClock>(self, clock: K) -> Checker<K> {
        Checker {
            tables: self.tables,
            options: self.options,
            clock,
        }
    }

    pub fn tables(&self) -> &TableSet {
        &self.tables
    }

    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    /// Resolve the main variable, table, frequency and cell_methods of a file.
    pub fn setup(&self, ds: &dyn Dataset) -> FileContext {
        FileContext::resolve(&self.tables, ds)
    }

    pub fn check_format(&self, ds: &dyn Dataset) -> CheckResult {
        format::check(ds, &self.options)
    }

    pub fn check_variable(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        variable::check(ds, ctx, &self.tables)
    }

    pub fn check_compression(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        compression::check(ds, ctx)
    }

    pub fn check_required_global_attributes(&self, ds: &dyn Dataset) -> CheckResult {
        global_attrs::check_presence(ds, &self.tables.cv)
    }

    /// Fails with the configuration error for a CV nesting deeper than two
    /// levels.
    pub fn check_required_global_attributes_cv(&self, ds: &dyn Dataset) -> CheckResult {
        global_attrs::check_required_cv(ds, &self.tables.cv, &self.options)
    }

    pub fn check_other_global_attributes_cv(&self, ds: &dyn Dataset) -> CheckResult {
        global_attrs::check_other_cv(ds, &self.tables.cv, &self.options)
    }

    pub fn check_variable_definition(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        variable_definition::check(ds, ctx, &self.tables)
    }

    pub fn check_missing_value(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        missing_value::check(ds, ctx, &self.tables)
    }

    pub fn check_time_continuity(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        time::check_continuity_of(&self.clock, ds, ctx)
    }

    pub fn check_time_bounds(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        time::check_bounds_of(&self.clock, ds, ctx)
    }

    pub fn check_time_chunking(&self, ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
        time::check_chunking_of(&self.clock, ds, ctx)
    }

    /// Run every check on one file.
    pub fn run_all(&self, ds: &dyn Dataset) -> FileReport {
        let span = tracing::info_span!("check_file", file = ds.file_name());
        let _guard = span.enter();

        let ctx = self.setup(ds);
        tracing::debug!(
            varnames = ?ctx.varnames,
            table_id = %ctx.table_id,
            frequency = %ctx.frequency,
            cell_methods = %ctx.cell_methods,
            "resolved file context"
        );

        let results = vec![
            // 1. File format
            self.check_format(ds),
            // 2. Present variables
            self.check_variable(ds, &ctx),
            // 3. Compression of the main variable
            self.check_compression(ds, &ctx),
            // 4. Global attributes: presence, then CV compliance
            self.check_required_global_attributes(ds),
            self.check_required_global_attributes_cv(ds),
            self.check_other_global_attributes_cv(ds),
            // 5. Main variable against its table entry
            self.check_variable_definition(ds, &ctx),
            self.check_missing_value(ds, &ctx),
            // 6. Time axis
            self.check_time_continuity(ds, &ctx),
            self.check_time_bounds(ds, &ctx),
            self.check_time_chunking(ds, &ctx),
        ];

        let report = FileReport {
            file_name: ds.file_name().to_string(),
            results,
        };
        tracing::info!(
            score = report.score(),
            out_of = report.out_of(),
            "checked file"
        );
        report
    }
}
