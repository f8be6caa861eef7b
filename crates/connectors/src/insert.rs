use crate::{
    error::BulkError,
    schema::{field::Field, model::ModelMeta},
    sql::{
        base::loader::CopyLoader,
        postgres::payload::{encode_records, encode_rows},
    },
};
use model::core::value::Value;
use tracing::debug;

/// Options for [`bulk_insert`].
#[derive(Debug, Clone)]
pub struct InsertOptions {
    /// Fields to populate, by name or storage column. `None` selects every
    /// field except the auto-generated primary key.
    pub columns: Option<Vec<String>>,
    /// Apply each field's auto-population before encoding. When off, the
    /// values held by the records are written as they are.
    pub run_prepare: bool,
    /// Overrides the table of the model.
    pub table_name: Option<String>,
}

impl Default for InsertOptions {
    fn default() -> Self {
        Self {
            columns: None,
            run_prepare: true,
            table_name: None,
        }
    }
}

impl InsertOptions {
    pub fn columns<S: AsRef<str>>(mut self, columns: &[S]) -> Self {
        self.columns = Some(columns.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }

    pub fn run_prepare(mut self, run_prepare: bool) -> Self {
        self.run_prepare = run_prepare;
        self
    }

    pub fn table_name(mut self, table_name: &str) -> Self {
        self.table_name = Some(table_name.to_string());
        self
    }
}

/// Inserts `records` with a single COPY. The caller owns the transaction
/// the loader runs in.
///
/// Column resolution happens before anything is encoded, and nothing
/// reaches the loader if any value fails to encode.
pub async fn bulk_insert<R, L>(
    loader: &L,
    meta: &ModelMeta<R>,
    records: &[R],
    options: &InsertOptions,
) -> Result<(), BulkError>
where
    L: CopyLoader + ?Sized,
{
    let fields = meta.resolve_fields(options.columns.as_deref())?;
    let table = options.table_name.as_deref().unwrap_or(&meta.table);
    let columns = fields
        .iter()
        .map(|f| f.column().to_string())
        .collect::<Vec<_>>();

    debug!(table, records = records.len(), ?columns, "Bulk insert");

    let payload = encode_records(records, &fields, options.run_prepare, &loader.context())?;
    loader.load(payload, table, &columns).await?;
    Ok(())
}

/// Inserts pre-extracted rows into `columns` of `table`, bypassing any
/// model metadata.
pub async fn bulk_insert_raw<L>(
    loader: &L,
    table: &str,
    rows: &[Vec<Value>],
    columns: &[String],
) -> Result<(), BulkError>
where
    L: CopyLoader + ?Sized,
{
    if columns.is_empty() {
        return Err(BulkError::NoColumns(table.to_string()));
    }

    debug!(table, rows = rows.len(), ?columns, "Raw bulk insert");

    let payload = encode_rows(rows, columns)?;
    loader.load(payload, table, columns).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::EncodeError,
        schema::{field::FieldDescriptor, kind::ColumnKind},
        sql::base::{context::ConnectionContext, error::DbError},
    };
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime, Utc};
    use model::core::data_type::DataType;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    struct LoadCall {
        payload: String,
        table: String,
        columns: Vec<String>,
    }

    #[derive(Default)]
    struct RecordingLoader {
        calls: Mutex<Vec<LoadCall>>,
    }

    impl RecordingLoader {
        fn calls(&self) -> Vec<LoadCall> {
            self.calls.lock().unwrap().clone()
        }

        fn last(&self) -> LoadCall {
            self.calls().pop().expect("loader was not called")
        }
    }

    #[async_trait]
    impl CopyLoader for RecordingLoader {
        fn context(&self) -> ConnectionContext {
            ConnectionContext { use_tz: false }
        }

        async fn load(
            &self,
            payload: String,
            table: &str,
            columns: &[String],
        ) -> Result<(), DbError> {
            self.calls.lock().unwrap().push(LoadCall {
                payload,
                table: table.to_string(),
                columns: columns.to_vec(),
            });
            Ok(())
        }
    }

    struct FailingLoader;

    #[async_trait]
    impl CopyLoader for FailingLoader {
        fn context(&self) -> ConnectionContext {
            ConnectionContext::default()
        }

        async fn load(&self, _: String, _: &str, _: &[String]) -> Result<(), DbError> {
            Err(DbError::Copy("rejected".into()))
        }
    }

    struct Poll {
        id: Option<i64>,
        question: String,
        pub_date: Option<NaiveDateTime>,
    }

    struct Choice {
        poll_id: i64,
        choice_text: String,
        votes: Option<i32>,
    }

    struct Article {
        title: String,
        created: NaiveDateTime,
    }

    fn poll_meta() -> ModelMeta<Poll> {
        ModelMeta::new("tests_poll")
            .field(
                FieldDescriptor::new("id", ColumnKind::Scalar(DataType::Long), |p: &Poll| {
                    p.id.map(Value::Int).unwrap_or(Value::Null)
                })
                .auto_primary_key(),
            )
            .field(
                FieldDescriptor::new(
                    "question",
                    ColumnKind::Scalar(DataType::VarChar),
                    |p: &Poll| Value::String(p.question.clone()),
                )
                .max_length(200),
            )
            .field(FieldDescriptor::new(
                "pub_date",
                ColumnKind::Scalar(DataType::TimestampTz),
                |p: &Poll| p.pub_date.map(Value::TimestampNaive).unwrap_or(Value::Null),
            ))
    }

    fn choice_meta() -> ModelMeta<Choice> {
        ModelMeta::new("tests_choice")
            .field(
                FieldDescriptor::new("id", ColumnKind::Scalar(DataType::Long), |_: &Choice| {
                    Value::Null
                })
                .auto_primary_key(),
            )
            .field(
                FieldDescriptor::new("poll", ColumnKind::Scalar(DataType::Long), |c: &Choice| {
                    Value::Int(c.poll_id)
                })
                .db_column("poll_id"),
            )
            .field(
                FieldDescriptor::new(
                    "choice_text",
                    ColumnKind::Scalar(DataType::VarChar),
                    |c: &Choice| Value::String(c.choice_text.clone()),
                )
                .max_length(200),
            )
            .field(FieldDescriptor::new(
                "votes",
                ColumnKind::Scalar(DataType::Int),
                |c: &Choice| c.votes.map(Value::Int32).unwrap_or(Value::Null),
            ))
    }

    fn article_meta() -> ModelMeta<Article> {
        ModelMeta::new("tests_article")
            .field(
                FieldDescriptor::new(
                    "title",
                    ColumnKind::Scalar(DataType::VarChar),
                    |a: &Article| Value::String(a.title.clone()),
                )
                .max_length(200),
            )
            .field(
                FieldDescriptor::new(
                    "created",
                    ColumnKind::Scalar(DataType::TimestampTz),
                    |a: &Article| Value::TimestampNaive(a.created),
                )
                .auto_now_add(),
            )
    }

    fn blank_choice() -> Choice {
        Choice {
            poll_id: 1,
            choice_text: String::new(),
            votes: None,
        }
    }

    fn polls() -> Vec<Poll> {
        vec![
            Poll {
                id: None,
                question: "Question1".into(),
                pub_date: Some(Utc::now().naive_utc()),
            },
            Poll {
                id: None,
                question: "Question2".into(),
                pub_date: Some(Utc::now().naive_utc()),
            },
        ]
    }

    async fn choice_payload(records: &[Choice], columns: &[&str]) -> LoadCall {
        let loader = RecordingLoader::default();
        bulk_insert(
            &loader,
            &choice_meta(),
            records,
            &InsertOptions::default().columns(columns),
        )
        .await
        .unwrap();
        loader.last()
    }

    #[tokio::test]
    async fn test_all_non_pk_columns_are_used_by_default() {
        let loader = RecordingLoader::default();
        bulk_insert(&loader, &poll_meta(), &polls(), &InsertOptions::default())
            .await
            .unwrap();

        let call = loader.last();
        assert_eq!(call.table, "tests_poll");
        assert_eq!(call.columns, vec!["question", "pub_date"]);
        assert_eq!(call.payload.lines().count(), 2);
    }

    #[tokio::test]
    async fn test_specified_columns_keep_caller_order() {
        let loader = RecordingLoader::default();
        let meta = poll_meta();

        for columns in [
            vec!["question"],
            vec!["pub_date"],
            vec!["question", "pub_date"],
            vec!["pub_date", "question"],
        ] {
            bulk_insert(
                &loader,
                &meta,
                &polls(),
                &InsertOptions::default().columns(&columns),
            )
            .await
            .unwrap();
            assert_eq!(loader.last().columns, columns);
        }
    }

    #[tokio::test]
    async fn test_foreign_key_is_loaded_into_storage_column() {
        let choice = Choice {
            poll_id: 1,
            choice_text: "Text".into(),
            votes: Some(0),
        };
        let call = choice_payload(&[choice], &["poll", "choice_text", "votes"]).await;

        assert_eq!(call.columns, vec!["poll_id", "choice_text", "votes"]);
        assert_eq!(call.payload, "1,Text,0\n");
    }

    #[tokio::test]
    async fn test_empty_string_positions() {
        let one = [blank_choice()];
        let two = [blank_choice(), blank_choice()];

        let cases: [(&[Choice], [&str; 3], &str); 6] = [
            (&one, ["choice_text", "poll", "votes"], "\"\",1,\n"),
            (&one, ["poll", "votes", "choice_text"], "1,,\"\"\n"),
            (&one, ["poll", "choice_text", "votes"], "1,\"\",\n"),
            (&two, ["choice_text", "poll", "votes"], "\"\",1,\n\"\",1,\n"),
            (&two, ["poll", "votes", "choice_text"], "1,,\"\"\n1,,\"\"\n"),
            (&two, ["poll", "choice_text", "votes"], "1,\"\",\n1,\"\",\n"),
        ];

        for (records, columns, expected) in cases {
            let call = choice_payload(records, &columns).await;
            assert_eq!(call.payload, expected, "columns {columns:?}");
        }
    }

    #[tokio::test]
    async fn test_null_cell_is_valid_csv() {
        let loader = RecordingLoader::default();
        let poll = Poll {
            id: None,
            question: "Q".into(),
            pub_date: None,
        };
        bulk_insert(&loader, &poll_meta(), &[poll], &InsertOptions::default())
            .await
            .unwrap();

        let payload = loader.last().payload;
        assert_eq!(payload, "Q,\n");

        let rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(payload.as_bytes())
            .records()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Q");
        assert_eq!(&rows[0][1], "");
    }

    #[tokio::test]
    async fn test_prepare_is_skipped_on_request() {
        let created = NaiveDate::from_ymd_opt(2018, 6, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let articles = vec![
            Article {
                title: "My best article".into(),
                created,
            },
            Article {
                title: "My second best article".into(),
                created,
            },
        ];
        let meta = article_meta();
        let loader = RecordingLoader::default();

        bulk_insert(
            &loader,
            &meta,
            &articles,
            &InsertOptions::default().run_prepare(false),
        )
        .await
        .unwrap();
        assert_eq!(
            loader.last().payload,
            "My best article,2018-06-19 00:00:00\nMy second best article,2018-06-19 00:00:00\n"
        );

        for options in [InsertOptions::default().run_prepare(true), InsertOptions::default()] {
            bulk_insert(&loader, &meta, &articles, &options).await.unwrap();
            assert!(!loader.last().payload.contains("2018-06-19 00:00:00"));
        }
    }

    #[tokio::test]
    async fn test_empty_records_still_invoke_loader() {
        let loader = RecordingLoader::default();
        bulk_insert(&loader, &poll_meta(), &[], &InsertOptions::default())
            .await
            .unwrap();

        assert_eq!(
            loader.calls(),
            vec![LoadCall {
                payload: String::new(),
                table: "tests_poll".into(),
                columns: vec!["question".into(), "pub_date".into()],
            }]
        );
    }

    #[tokio::test]
    async fn test_unknown_column_fails_before_load() {
        let loader = RecordingLoader::default();
        let err = bulk_insert(
            &loader,
            &poll_meta(),
            &polls(),
            &InsertOptions::default().columns(&["question", "nope"]),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BulkError::UnknownColumn(ref c) if c == "nope"));
        assert!(loader.calls().is_empty());
    }

    #[tokio::test]
    async fn test_table_name_override() {
        let loader = RecordingLoader::default();
        bulk_insert(
            &loader,
            &poll_meta(),
            &polls(),
            &InsertOptions::default().table_name("archive.tests_poll"),
        )
        .await
        .unwrap();

        assert_eq!(loader.last().table, "archive.tests_poll");
    }

    #[tokio::test]
    async fn test_loader_errors_propagate() {
        let err = bulk_insert(&FailingLoader, &poll_meta(), &polls(), &InsertOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BulkError::Load(DbError::Copy(_))));
    }

    #[tokio::test]
    async fn test_raw_insert() {
        let loader = RecordingLoader::default();
        let columns = vec!["choice_text".to_string(), "poll_id".into(), "votes".into()];
        let rows = vec![
            vec![Value::String(String::new()), Value::Int(1), Value::Null],
            vec![Value::String("Yes".into()), Value::Int(1), Value::Int(3)],
        ];

        bulk_insert_raw(&loader, "tests_choice", &rows, &columns)
            .await
            .unwrap();

        let call = loader.last();
        assert_eq!(call.payload, "\"\",1,\nYes,1,3\n");
        assert_eq!(call.columns, columns);
    }

    #[tokio::test]
    async fn test_raw_insert_rejects_bad_rows_before_load() {
        let loader = RecordingLoader::default();
        let columns = vec!["a".to_string()];

        let err = bulk_insert_raw(&loader, "t", &[vec![Value::Int(1), Value::Int(2)]], &columns)
            .await
            .unwrap_err();
        assert!(matches!(err, BulkError::Encode(EncodeError::RowWidth { .. })));

        let err = bulk_insert_raw(&loader, "t", &[vec![Value::Bytes(vec![0])]], &columns)
            .await
            .unwrap_err();
        assert!(matches!(err, BulkError::Encode(EncodeError::Column { .. })));

        assert!(loader.calls().is_empty());
    }
}
