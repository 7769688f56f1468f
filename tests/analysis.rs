mod common;

use anyhow::Result;
use common::{SplitDataSource, fixtures};
use dataprobe::analyzer::{Analyzer, AnalyzerSettings};
use dataprobe::datamodel::{ColumnType, SampleSize, Series, Suggestion};
use dataprobe::error::AnalysisError;
use dataprobe::importers::Format;
use dataprobe::test_utils::StaticDataSource;
use std::sync::Arc;

fn analyzer(source: StaticDataSource) -> (Analyzer, Arc<StaticDataSource>) {
    let source = Arc::new(source);
    let analyzer = Analyzer::new(source.clone(), AnalyzerSettings::default());
    (analyzer, source)
}

fn types(result: &dataprobe::datamodel::AnalysisResult) -> Vec<(&str, ColumnType)> {
    result
        .schema
        .iter()
        .map(|column| (column.name.as_str(), column.inferred_type))
        .collect()
}

#[tokio::test]
async fn test_csv_with_coordinates() -> Result<()> {
    // Given: a CSV of weather stations with decimal commas
    let (analyzer, _) = analyzer(
        StaticDataSource::default()
            .with_body("https://datos.example.org/estaciones.csv", fixtures::stations_csv()),
    );

    // When: it is analyzed
    let result = analyzer
        .analyze(
            "https://datos.example.org/estaciones.csv",
            None,
            SampleSize::Limited(80),
        )
        .await?;

    // Then: coordinates are recognized by name
    assert_eq!(result.format_detected.as_deref(), Some("csv"));
    assert_eq!(
        types(&result),
        vec![
            ("Estación", ColumnType::String),
            ("Latitud", ColumnType::Latitude),
            ("Longitud", ColumnType::Longitude),
            ("Temperatura", ColumnType::Numeric),
        ]
    );
    assert_eq!(
        result.suggestions,
        vec![
            Suggestion::barchart("Estación", "Temperatura"),
            Suggestion::piechart("Estación", "Temperatura"),
            Suggestion::heatmap("Latitud", "Longitud"),
            Suggestion::table(),
        ]
    );
    assert_eq!(result.suggestion, Suggestion::barchart("Estación", "Temperatura"));
    assert_eq!(result.sample_rows_count, 3);
    assert_eq!(result.sample_rows[1].get("Temperatura"), Some("23,1"));
    Ok(())
}

#[tokio::test]
async fn test_keys_are_normalized() -> Result<()> {
    let (analyzer, _) = analyzer(
        StaticDataSource::default()
            .with_body("https://datos.example.org/paro.csv", fixtures::monthly_rate_csv()),
    );

    let result = analyzer
        .analyze("https://datos.example.org/paro.csv", None, SampleSize::Unbounded)
        .await?;

    assert_eq!(
        types(&result),
        vec![
            ("Fecha Ref", ColumnType::Datetime),
            ("Tasa Paro", ColumnType::Numeric),
        ]
    );
    assert_eq!(
        result.suggestion,
        Suggestion::timeseries("Fecha Ref", "Tasa Paro")
    );
    Ok(())
}

#[tokio::test]
async fn test_sample_size_bounds_rows() -> Result<()> {
    let (analyzer, _) = analyzer(
        StaticDataSource::default()
            .with_body("https://datos.example.org/paro.csv", fixtures::monthly_rate_csv()),
    );

    let result = analyzer
        .analyze(
            "https://datos.example.org/paro.csv",
            None,
            SampleSize::Limited(2),
        )
        .await?;

    assert_eq!(result.sample_rows_count, 2);
    assert_eq!(result.sample_rows.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_cascade_skips_empty_csv() -> Result<()> {
    // Given: a locator without a recognizable suffix, where CSV sampling sees only
    // a header and the JSON document holds three records
    let source = SplitDataSource {
        lines: "fecha,valor\n",
        body: fixtures::wrapped_json(),
    };
    let analyzer = Analyzer::new(Arc::new(source), AnalyzerSettings::default());

    // When: it is analyzed without a format
    let result = analyzer
        .analyze("https://datos.example.org/api/paro", None, SampleSize::Limited(80))
        .await?;

    // Then: JSON wins the cascade
    assert_eq!(result.format_detected.as_deref(), Some("json"));
    assert_eq!(result.sample_rows_count, 3);
    assert_eq!(
        types(&result),
        vec![
            ("Fecha", ColumnType::Datetime),
            ("Valor", ColumnType::Numeric),
        ]
    );
    assert_eq!(result.suggestion, Suggestion::timeseries("Fecha", "Valor"));
    Ok(())
}

#[tokio::test]
async fn test_cascade_reaches_pc_axis() -> Result<()> {
    let (analyzer, source) = analyzer(
        StaticDataSource::default()
            .with_body("https://datos.example.org/descarga/4247", fixtures::regional_cube_px()),
    );

    let result = analyzer
        .analyze(
            "https://datos.example.org/descarga/4247",
            None,
            SampleSize::Limited(80),
        )
        .await?;

    assert_eq!(result.format_detected.as_deref(), Some("pc-axis"));
    assert_eq!(
        types(&result),
        vec![
            ("Comunidad", ColumnType::GeoName),
            ("Periodo", ColumnType::Datetime),
            ("Value", ColumnType::Numeric),
        ]
    );
    assert_eq!(result.sample_rows_count, 4);
    // the confidential cell is kept as an empty value
    assert_eq!(result.sample_rows[3].get("Comunidad"), Some("Cataluña"));
    assert_eq!(result.sample_rows[3].get("Value"), Some(""));
    assert_eq!(
        result.suggestions,
        vec![
            Suggestion::timeseries("Periodo", "Value"),
            Suggestion::choropleth("Comunidad", "Value"),
            Suggestion::table(),
        ]
    );
    // every fetcher read the same locator
    assert_eq!(source.requests().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_cascade_without_data() {
    let (analyzer, _) = analyzer(
        StaticDataSource::default().with_body("https://datos.example.org/vacio", ""),
    );

    let result = analyzer
        .analyze("https://datos.example.org/vacio", None, SampleSize::Limited(80))
        .await;

    match result {
        Err(AnalysisError::NoData { attempted }) => {
            assert_eq!(attempted, vec![Format::Csv, Format::Json, Format::PcAxis]);
        }
        other => panic!("Expected NoData, got {:?}", other.map(|r| r.format_detected)),
    }
}

#[tokio::test]
async fn test_cascade_swallows_fetch_errors() {
    let (analyzer, source) = analyzer(
        StaticDataSource::default().with_failure("https://datos.example.org/caido", "timed out"),
    );

    let result = analyzer
        .analyze("https://datos.example.org/caido", None, SampleSize::Limited(80))
        .await;

    assert!(matches!(result, Err(AnalysisError::NoData { .. })));
    assert_eq!(source.requests().len(), 3);
}

#[tokio::test]
async fn test_known_format_errors_surface() {
    let (analyzer, source) = analyzer(
        StaticDataSource::default()
            .with_status("https://datos.example.org/paro.csv", 503)
            .with_failure("https://datos.example.org/paro.json", "connection refused"),
    );

    let result = analyzer
        .analyze("https://datos.example.org/paro.csv", None, SampleSize::Limited(80))
        .await;
    assert!(matches!(
        result,
        Err(AnalysisError::HttpStatus { status: 503, .. })
    ));

    let result = analyzer
        .analyze("https://datos.example.org/paro.json", None, SampleSize::Limited(80))
        .await;
    assert!(matches!(result, Err(AnalysisError::Fetch { .. })));

    // no cascade after a sniffed format failed
    assert_eq!(source.requests().len(), 2);
}

#[tokio::test]
async fn test_ine_series_are_aligned() -> Result<()> {
    // Given: an INE table page
    let (analyzer, source) = analyzer(StaticDataSource::default().with_body(
        "https://servicios.ine.es/wstempus/js/es/DATOS_TABLA/50902",
        fixtures::ine_table_json(),
    ));

    // When: it is analyzed
    let result = analyzer
        .analyze(
            "https://www.ine.es/jaxiT3/Tabla.htm?t=50902&L=0",
            None,
            SampleSize::Limited(80),
        )
        .await?;

    // Then: the table endpoint was queried
    assert_eq!(
        source.requests(),
        vec!["https://servicios.ine.es/wstempus/js/es/DATOS_TABLA/50902".to_string()]
    );
    assert_eq!(result.format_detected.as_deref(), Some("ine-api"));
    assert_eq!(
        result.labels,
        Some(vec!["1672527600000".to_string(), "1680300000000".to_string()])
    );
    assert_eq!(
        result.series,
        Some(vec![
            Series {
                name: "Total Nacional. Tasa de paro.".to_string(),
                data: vec![Some(13.26), Some(11.6)],
            },
            Series {
                name: "Madrid. Tasa de paro.".to_string(),
                data: vec![None, Some(10.8)],
            },
        ])
    );
    assert_eq!(result.sample_rows_count, 3);

    // And: the table view has no date column, yet the primary chart is a time series
    assert_eq!(result.suggestions, vec![Suggestion::table()]);
    assert_eq!(result.suggestion, Suggestion::timeseries("Fecha", "Valor"));
    Ok(())
}

#[tokio::test]
async fn test_ine_takes_precedence_over_suffix() -> Result<()> {
    let (analyzer, source) = analyzer(StaticDataSource::default().with_body(
        "https://servicios.ine.es/wstempus/js/es/DATOS_TABLA/50902",
        fixtures::ine_table_json(),
    ));

    let result = analyzer
        .analyze("50902", Some("csv"), SampleSize::Unbounded)
        .await?;

    assert_eq!(result.format_detected.as_deref(), Some("ine-api"));
    assert_eq!(source.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_ine_sample_keeps_latest_points() -> Result<()> {
    let (analyzer, _) = analyzer(StaticDataSource::default().with_body(
        "https://servicios.ine.es/wstempus/js/es/DATOS_TABLA/50902",
        fixtures::ine_table_json(),
    ));

    let result = analyzer
        .analyze("50902", None, SampleSize::Limited(1))
        .await?;

    assert_eq!(result.labels, Some(vec!["1680300000000".to_string()]));
    assert_eq!(result.sample_rows_count, 2);
    Ok(())
}

#[tokio::test]
async fn test_ine_without_table_id() {
    let (analyzer, source) = analyzer(StaticDataSource::default());

    let result = analyzer
        .analyze("https://www.ine.es/", None, SampleSize::Limited(80))
        .await;

    assert!(matches!(result, Err(AnalysisError::InvalidTableId(_))));
    assert!(source.requests().is_empty());
}
