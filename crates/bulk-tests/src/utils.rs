#![allow(dead_code)]

use chrono::NaiveDateTime;
use connectors::{ColumnKind, FieldDescriptor, ModelMeta};
use model::core::{data_type::DataType, value::Value};
use tokio_postgres::Client;

pub const POLL_TABLE_DDL: &str = r#"CREATE TABLE tests_poll (
  id SERIAL PRIMARY KEY,
  question VARCHAR(200) NOT NULL,
  pub_date TIMESTAMPTZ
);"#;

pub const CHOICE_TABLE_DDL: &str = r#"CREATE TABLE tests_choice (
  id SERIAL PRIMARY KEY,
  poll_id INTEGER NOT NULL,
  choice_text VARCHAR(200),
  votes INTEGER
);"#;

pub const ARTICLE_TABLE_DDL: &str = r#"CREATE TABLE tests_article (
  id SERIAL PRIMARY KEY,
  title VARCHAR(200) NOT NULL,
  tags TEXT[],
  scores INT[],
  created TIMESTAMPTZ NOT NULL
);"#;

pub const NOTE_TABLE_DDL: &str = r#"CREATE TABLE tests_note (body TEXT);"#;

pub struct Poll {
    pub question: String,
    pub pub_date: Option<NaiveDateTime>,
}

pub struct Choice {
    pub poll_id: i64,
    pub choice_text: Option<String>,
    pub votes: Option<i32>,
}

pub struct Article {
    pub title: String,
    pub tags: Vec<String>,
    pub scores: Option<Vec<i64>>,
    pub created: NaiveDateTime,
}

pub fn poll_meta() -> ModelMeta<Poll> {
    ModelMeta::new("tests_poll")
        .field(
            FieldDescriptor::new("id", ColumnKind::Scalar(DataType::Int), |_: &Poll| {
                Value::Null
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

pub fn choice_meta() -> ModelMeta<Choice> {
    ModelMeta::new("tests_choice")
        .field(
            FieldDescriptor::new("poll", ColumnKind::Scalar(DataType::Int), |c: &Choice| {
                Value::Int(c.poll_id)
            })
            .db_column("poll_id"),
        )
        .field(
            FieldDescriptor::new(
                "choice_text",
                ColumnKind::Scalar(DataType::VarChar),
                |c: &Choice| {
                    c.choice_text
                        .clone()
                        .map(Value::String)
                        .unwrap_or(Value::Null)
                },
            )
            .max_length(200),
        )
        .field(FieldDescriptor::new(
            "votes",
            ColumnKind::Scalar(DataType::Int),
            |c: &Choice| c.votes.map(Value::Int32).unwrap_or(Value::Null),
        ))
}

pub fn article_meta() -> ModelMeta<Article> {
    ModelMeta::new("tests_article")
        .field(
            FieldDescriptor::new(
                "title",
                ColumnKind::Scalar(DataType::VarChar),
                |a: &Article| Value::String(a.title.clone()),
            )
            .max_length(200),
        )
        .field(FieldDescriptor::new(
            "tags",
            ColumnKind::TextArray,
            |a: &Article| Value::StringArray(a.tags.clone()),
        ))
        .field(FieldDescriptor::new(
            "scores",
            ColumnKind::IntArray,
            |a: &Article| {
                a.scores
                    .clone()
                    .map(Value::IntArray)
                    .unwrap_or(Value::Null)
            },
        ))
        .field(
            FieldDescriptor::new(
                "created",
                ColumnKind::Scalar(DataType::TimestampTz),
                |a: &Article| Value::TimestampNaive(a.created),
            )
            .auto_now_add(),
        )
}

pub async fn count(client: &Client, sql: &str) -> i64 {
    client
        .query_one(sql, &[])
        .await
        .expect("count query")
        .get(0)
}
