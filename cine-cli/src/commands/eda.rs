//! EDA command - quick look at the movie CSV without touching the graph

use cine_core::{movies_released_before, read_movies, MovieRecord, MOVIE_FILE};
use colored::Colorize;
use serde::Serialize;

use super::Settings;
use crate::output::{Column, CsvOutput, Output, OutputConfig, Outputter, TableOutput};

/// Release-year cutoff used when `--before` is not given.
pub const DEFAULT_BEFORE_YEAR: i64 = 2015;

#[derive(Debug, Serialize)]
pub struct EdaResults {
    pub source: String,
    pub before: i64,
    pub total: usize,
    pub movies: Vec<MovieRecord>,
}

impl EdaResults {
    fn columns() -> Vec<Column> {
        vec![
            Column::new("title", "title"),
            Column::new("year", "year"),
            Column::new("summary", "summary").with_max_width(70),
        ]
    }
}

impl Outputter for EdaResults {
    fn to_table(&self, config: &OutputConfig) -> String {
        format!(
            "{} {} of {} movies released before {}\n{}",
            "EDA:".cyan().bold(),
            self.movies.len(),
            self.total,
            self.before,
            TableOutput::format_with_columns(&self.movies, &Self::columns(), config)
        )
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        CsvOutput::format_with_columns(&self.movies, &Self::columns())
    }
}

pub fn run(settings: &Settings, before: i64) -> anyhow::Result<()> {
    let source = settings.data_dir.join(MOVIE_FILE);
    let all = read_movies(&source)?;
    let movies = movies_released_before(&all, before);

    let results = EdaResults {
        source: source.display().to_string(),
        before,
        total: all.len(),
        movies,
    };
    Output::new(&results, &settings.output).render()
}
