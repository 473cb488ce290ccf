use std::collections::BTreeMap;

use serde_json::json;

use cc6_model::{CheckLevel, CheckerOptions, ControlledVocabulary, CvEntry, FileReport};
use cc6_standards::TableSet;
use cc6_standards::registry::{parse_auxiliary_table, parse_cv, parse_variable_table};
use cc6_validate::{Checker, Compression, DatasetSnapshot, Variable};

const MONTHS: usize = 120;

fn tables() -> TableSet {
    let cv = parse_cv(&json!({"CV": {
        "required_global_attributes": [
            "project_id", "activity_id", "domain_id", "driving_source_id",
            "source_id", "institution_id", "frequency", "version_realization"
        ],
        "project_id": ["CORDEX-CMIP6"],
        "activity_id": ["DD"],
        "domain_id": ["EUR-12", "AFR-22"],
        "frequency": {"mon": "monthly mean samples", "day": "daily mean samples", "fx": "fixed"},
        "version_realization": "v[[:digit:]]\\{1,\\}-r[[:digit:]]\\{1,\\}",
        "institution_id": {"GERICS": "Climate Service Center Germany", "DWD": "Deutscher Wetterdienst"},
        "driving_source_id": {"ERA5": "ECMWF reanalysis v5", "MPI-ESM1-2-HR": "MPI Earth System Model"},
        "driving_experiment_id": {
            "historical": {"driving_activity_id": ["CMIP"]},
            "evaluation": {"driving_activity_id": ["DD"], "driving_source_id": ["ERA5"]}
        },
        "source_id": {
            "REMO2020": {
                "institution_id": ["GERICS"],
                "license": "https://cordex.org/data-access/cordex-cmip6-data/cordex-cmip6-terms-of-use"
            }
        },
        "tracking_id": "hdl:21\\.14103/.+"
    }}))
    .unwrap();

    let mut variable_tables = BTreeMap::new();
    for (table, entries) in [
        ("1hr", json!({})),
        ("6hr", json!({})),
        ("day", json!({"pr": {"frequency": "day", "cell_methods": "area: time: mean", "units": "kg m-2 s-1"}})),
        ("mon", json!({"tas": {
            "frequency": "mon",
            "cell_methods": "area: time: mean",
            "standard_name": "air_temperature",
            "long_name": "Near-Surface Air Temperature",
            "units": "K",
            "out_name": "tas"
        }})),
        ("fx", json!({"orog": {"frequency": "fx", "cell_methods": "area: mean", "units": "m"}})),
    ] {
        let value = json!({
            "Header": {"table_id": format!("Table {table}"), "missing_value": 1e20},
            "variable_entry": entries
        });
        variable_tables.insert(table.to_string(), parse_variable_table(table, value).unwrap());
    }

    let coordinate = parse_auxiliary_table(
        "coordinate",
        json!({"axis_entry": {"time": {"out_name": "time"}, "height2m": {"out_name": "height"}}}),
    )
    .unwrap();
    let mut tables = TableSet::from_parts(cv, variable_tables, coordinate);
    tables.grids = parse_auxiliary_table(
        "grids",
        json!({
            "axis_entry": {"grid_latitude": {"out_name": "rlat"}, "grid_longitude": {"out_name": "rlon"}},
            "variable_entry": {"latitude": {"out_name": "lat"}, "longitude": {"out_name": "lon"}}
        }),
    )
    .unwrap();
    tables
}

/// Ten years of monthly means on a 360_day calendar, skipping `gaps`.
fn monthly_dataset(gaps: &[usize]) -> DatasetSnapshot {
    let months: Vec<usize> = (0..MONTHS).filter(|month| !gaps.contains(month)).collect();
    let values: Vec<f64> = months.iter().map(|m| 30.0 * *m as f64 + 15.0).collect();
    let bounds: Vec<f64> = months
        .iter()
        .flat_map(|m| [30.0 * *m as f64, 30.0 * *m as f64 + 30.0])
        .collect();

    DatasetSnapshot::new("tas_EUR-12_ERA5_evaluation_r1i1p1f1_GERICS_REMO2020_v1-r1_mon_201101-202012.nc")
        .with_format("NETCDF4_CLASSIC", "HDF5")
        .with_global("project_id", "CORDEX-CMIP6")
        .with_global("activity_id", "DD")
        .with_global("domain_id", "EUR-12")
        .with_global("driving_experiment_id", "evaluation")
        .with_global("driving_source_id", "ERA5")
        .with_global("source_id", "REMO2020")
        .with_global("institution_id", "GERICS")
        .with_global("frequency", "mon")
        .with_global("version_realization", "v1-r1")
        .with_global("tracking_id", "not-a-handle")
        .with_variable(
            Variable::new("time")
                .with_dimensions(["time"])
                .with_attribute("axis", "T")
                .with_attribute("units", "days since 2011-01-01 00:00:00")
                .with_attribute("calendar", "360_day")
                .with_attribute("bounds", "time_bnds")
                .with_values(values),
        )
        .with_variable(
            Variable::new("time_bnds")
                .with_dimensions(["time", "bnds"])
                .with_shaped_values(vec![months.len(), 2], bounds),
        )
        .with_variable(Variable::new("rlat").with_values(vec![-1.0, 0.0, 1.0]))
        .with_variable(Variable::new("rlon").with_values(vec![-1.0, 0.0, 1.0]))
        .with_variable(Variable::new("lat"))
        .with_variable(Variable::new("lon"))
        .with_variable(Variable::new("crs").with_attribute("grid_mapping_name", "rotated_latitude_longitude"))
        .with_variable(
            Variable::new("tas")
                .with_dimensions(["time", "rlat", "rlon"])
                .with_attribute("standard_name", "air_temperature")
                .with_attribute("long_name", "Near-Surface Air Temperature")
                .with_attribute("units", "K")
                .with_attribute("grid_mapping", "crs")
                .with_attribute("_FillValue", 1e20)
                .with_attribute("missing_value", 1e20)
                .with_compression(1, true),
        )
}

fn render_failures(report: &FileReport) -> String {
    let mut out = Vec::new();
    for result in report.failures_at_least(CheckLevel::Low) {
        out.push(format!(
            "[{}] {} {}/{}",
            result.level, result.name, result.score, result.out_of
        ));
        out.extend(result.messages.iter().map(|message| format!("- {message}")));
    }
    out.join("\n")
}

#[test]
fn compliant_file_scores_full_marks() {
    let checker = Checker::new(tables(), Default::default());
    let report = checker.run_all(&monthly_dataset(&[]));

    assert_eq!(render_failures(&report), "");
    assert_eq!(report.results.len(), 11);
    assert_eq!(report.score(), report.out_of());
    assert_eq!(report.out_of(), 33);
}

#[test]
fn dependent_attributes_follow_source_and_experiment() {
    let ds = monthly_dataset(&[])
        .with_global("driving_source_id", "MPI-ESM1-2-HR")
        .with_global("institution_id", "DWD");
    let checker = Checker::new(tables(), Default::default());

    let result = checker.check_required_global_attributes_cv(&ds);

    assert_eq!((result.score, result.out_of), (6, 8));
    assert_eq!(
        result.messages,
        vec![
            "Required global attribute 'driving_source_id' does not comply with the CV: 'MPI-ESM1-2-HR'.",
            "Required global attribute 'institution_id' does not comply with the CV: 'DWD'.",
        ]
    );
    // driving_experiment_id is not required and itself complies.
    let other = checker.check_other_global_attributes_cv(&ds);
    assert!(other.is_full_score());
    assert_eq!(other.out_of, 1);
}

#[test]
fn hard_checked_attributes_skip_the_cv() {
    let tables = tables();
    let lenient = Checker::new(tables.clone(), Default::default());
    let strict = Checker::new(
        tables,
        CheckerOptions::default().with_hard_checks(["creation_date"]),
    );
    let ds = monthly_dataset(&[]);

    assert!(lenient.check_other_global_attributes_cv(&ds).is_full_score());
    let result = strict.check_other_global_attributes_cv(&ds);
    assert_eq!(
        result.messages,
        vec!["Global attribute 'tracking_id' does not comply with the CV: 'not-a-handle'."]
    );
}

#[test]
fn broken_file_reports_every_problem() {
    let mut ds = monthly_dataset(&[2])
        .with_global("driving_source_id", "MPI-ESM1-2-HR")
        .with_global("institution_id", "DWD")
        .with_global("version_realization", "v1")
        .with_variable(Variable::new("foo"));
    ds.global_attributes = ds.global_attributes.filtered(|name| name != "domain_id");
    if let Some(tas) = ds.variables.iter_mut().find(|var| var.name == "tas") {
        tas.compression = Some(Compression {
            complevel: 9,
            shuffle: false,
        });
    }

    let report = Checker::new(tables(), Default::default()).run_all(&ds);

    insta::assert_snapshot!(render_failures(&report), @r"
[Required] Present variables 1/2
- (Coordinate) variable(s) foo is/are not part of the CV.
[Recommended] Compression 0/1
- It is recommended that data should be compressed with a 'deflate level' of '1' and enabled 'shuffle' option.
-  The data is compressed with a higher 'deflate level' than recommended, this can lead to performance issues when accessing the data.
-  The 'shuffle' option is disabled.
[Required] Required global attributes. 7/8
- Required global attribute 'domain_id' is missing.
[Required] Required global attributes (CV). 4/7
- Required global attribute 'driving_source_id' does not comply with the CV: 'MPI-ESM1-2-HR'.
- Required global attribute 'institution_id' does not comply with the CV: 'DWD'.
- Required global attribute 'version_realization' does not comply with the CV: 'v1'.
[Required] Time continuity 0/1
- Discontinuity in time axis (frequency: 'mon') at index 1 ('2011-02-16 00:00:00'): delta-t 60 days from next timestep!
[Required] Time bounds 4/5
- Time bounds of timesteps 1 and 2 do not connect: upper bound '2011-03-01 00:00:00', next lower bound '2011-04-01 00:00:00'.
");
}

#[test]
fn unresolved_table_fails_missing_values() {
    let mut ds = monthly_dataset(&[]).with_variable(
        Variable::new("tas")
            .with_dimensions(["time", "rlat", "rlon"])
            .with_attribute("_FillValue", -9999.0),
    );
    ds.global_attributes = ds.global_attributes.filtered(|name| name != "frequency");
    let checker = Checker::new(tables(), Default::default());
    let ctx = checker.setup(&ds);
    assert_eq!(ctx.table_id, "unknown");

    let result = checker.check_missing_value(&ds, &ctx);

    assert_eq!((result.score, result.out_of), (0, 2));
    assert_eq!(
        result.messages,
        vec!["Cannot determine the missing_value of table 'unknown' for variable 'tas'."]
    );
}

#[test]
fn unusable_cv_fails_its_checks_but_not_the_file() {
    let mut tables = tables();
    tables.cv = ControlledVocabulary::new(BTreeMap::from([(
        "source_id".to_string(),
        CvEntry::KeyedNested(BTreeMap::from([(
            "REMO2020".to_string(),
            BTreeMap::from([(
                "driving_source_id".to_string(),
                CvEntry::KeyedNested(BTreeMap::from([("ERA5".to_string(), BTreeMap::new())])),
            )]),
        )])),
    )]));

    let report = Checker::new(tables, Default::default()).run_all(&monthly_dataset(&[]));

    assert_eq!(report.results.len(), 11);
    for name in ["Required global attributes (CV).", "Global attributes (CV)."] {
        let result = report.results.iter().find(|result| result.name == name).unwrap();
        assert_eq!((result.score, result.out_of), (0, 1), "{name}");
        assert_eq!(
            result.messages,
            vec!["CV entry 'source_id.REMO2020.driving_source_id' nests deeper than two comparison levels"]
        );
    }
}

#[test]
fn fixed_fields_skip_time_checks() {
    let ds = DatasetSnapshot::new("orog_fx.nc")
        .with_format("NETCDF4_CLASSIC", "HDF5")
        .with_global("frequency", "fx")
        .with_variable(Variable::new("orog").with_attribute("units", "m"));
    let checker = Checker::new(tables(), Default::default());
    let ctx = checker.setup(&ds);

    assert_eq!(ctx.frequency, "fx");
    assert!(checker.check_time_continuity(&ds, &ctx).is_full_score());
    assert!(checker.check_time_bounds(&ds, &ctx).is_full_score());
    assert!(checker.check_time_chunking(&ds, &ctx).is_full_score());
}

#[test]
fn missing_time_metadata_is_reported() {
    let mut ds = monthly_dataset(&[]);
    if let Some(time) = ds.variables.iter_mut().find(|var| var.name == "time") {
        time.attributes = time
            .attributes
            .filtered(|name| name != "calendar" && name != "units");
    }
    let checker = Checker::new(tables(), Default::default());
    let ctx = checker.setup(&ds);

    assert_eq!(
        checker.check_time_chunking(&ds, &ctx).messages,
        vec![
            "'time' variable has no 'calendar' attribute.",
            "'time' variable has no 'units' attribute.",
        ]
    );
    assert_eq!(
        checker.check_time_continuity(&ds, &ctx).messages,
        vec!["'time' variable has no 'units' attribute."]
    );
}

#[test]
fn undecodable_bound_is_reported_per_index() {
    let mut bounds: Vec<f64> = (0..MONTHS)
        .flat_map(|m| [30.0 * m as f64, 30.0 * m as f64 + 30.0])
        .collect();
    bounds[2] = f64::NAN;
    let ds = monthly_dataset(&[]).with_variable(
        Variable::new("time_bnds")
            .with_dimensions(["time", "bnds"])
            .with_shaped_values(vec![MONTHS, 2], bounds),
    );
    let checker = Checker::new(tables(), Default::default());
    let ctx = checker.setup(&ds);

    let result = checker.check_time_bounds(&ds, &ctx);

    assert_eq!((result.score, result.out_of), (2, 5));
    assert_eq!(
        result.messages,
        vec![
            "Time values are not centered within their bounds at index(es): 1.",
            "Time bounds are not strictly increasing at index(es): 1.",
            "Time bounds could not be decoded at index(es): 1.",
        ]
    );
}

#[test]
fn truncated_chunk_is_explained() {
    let gaps: Vec<usize> = (60..MONTHS).collect();
    let ds = monthly_dataset(&gaps);
    let checker = Checker::new(tables(), Default::default());
    let ctx = checker.setup(&ds);

    let result = checker.check_time_chunking(&ds, &ctx);

    assert_eq!(
        result.messages,
        vec![
            "The last timestep differs from expectation ('2020-12-16 00:00:00'): '2015-12-16 00:00:00'. \
             Unless for the last file of a timeseries '10' full simulation years are expected in the data file for frequency 'mon'."
        ]
    );
}

#[test]
fn report_serializes_for_the_host() {
    let checker = Checker::new(tables(), Default::default());
    let report = checker.run_all(&monthly_dataset(&[]));
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["results"][0]["name"], "File format");
    assert_eq!(json["results"][0]["level"], "high");
    assert_eq!(json["results"][0]["out_of"], 1);
}
