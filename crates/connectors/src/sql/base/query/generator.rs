use planner::query::{
    ast::common::TableRef,
    builder::copy::CopyBuilder,
    dialect::Dialect,
    renderer::{Render, Renderer},
};

pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Generates `COPY <table> (<columns>) FROM STDIN WITH (FORMAT csv)`.
    /// A `schema.table` name is split and both parts quoted.
    pub fn copy_from_stdin<S: AsRef<str>>(&self, table: &str, columns: &[S]) -> String {
        let copy = CopyBuilder::new(TableRef::parse(table))
            .columns(columns)
            .option("FORMAT", Some("csv"))
            .build();

        let mut renderer = Renderer::new(self.dialect);
        copy.render(&mut renderer);
        renderer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::dialect::Postgres;

    #[test]
    fn test_copy_from_stdin() {
        let generator = QueryGenerator::new(&Postgres);

        assert_eq!(
            generator.copy_from_stdin("tests_choice", &["poll_id", "choice", "votes"]),
            r#"COPY "tests_choice" ("poll_id", "choice", "votes") FROM STDIN WITH (FORMAT csv)"#
        );
        assert_eq!(
            generator.copy_from_stdin("archive.tests_poll", &["question"]),
            r#"COPY "archive"."tests_poll" ("question") FROM STDIN WITH (FORMAT csv)"#
        );
    }
}
