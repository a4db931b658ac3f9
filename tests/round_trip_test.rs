mod common;

use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::{TimeZone, Utc};
use docmapper::prelude::*;
use serde_json::json;
use url::Url;

use common::{ChildEntity, Gallery, SimpleEntity, Tweet};

fn gallery() -> Gallery {
    Gallery {
        title: "summer".to_string(),
        published: true,
        views: 9_000_000_000,
        rank: -3,
        rating: 4.5,
        scores: vec![10, 20, 30].into_boxed_slice(),
        tags: HashSet::from(["beach".to_string(), "sun".to_string()]),
        sizes: BTreeSet::from([640, 1024]),
        history: VecDeque::from([1.25, 0.5]),
        grid: vec![vec![1, 2], vec![], vec![3]],
        links: vec![Url::parse("https://example.com/a").unwrap()],
        homepage: Some(Url::parse("https://example.com/").unwrap()),
        updated: Some(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap()),
    }
}

#[test]
fn test_gallery_round_trip() -> Result<()> {
    let context = common::context();
    context.register::<Gallery>()?;

    let original = gallery();
    let document = context.to_document(&original)?;

    assert_eq!(document.get_field("scores"), Some(&json!([10, 20, 30])));
    assert_eq!(document.get_field("sizes"), Some(&json!([640, 1024])));
    assert_eq!(document.get_field("grid"), Some(&json!([[1, 2], [], [3]])));
    assert_eq!(document.get_str("homepage"), Some("https://example.com/"));
    assert_eq!(document.get_str("updated"), Some("2023-11-14T22:13:20.123Z"));

    let read: Gallery = context.from_document(&document)?;
    assert_eq!(read, original);
    Ok(())
}

#[test]
fn test_gallery_schema() -> Result<()> {
    let context = common::context();
    context.register::<Gallery>()?;

    let schema = context.schema::<Gallery>()?.to_json()?;
    let properties = &schema["gallery"]["properties"];

    assert_eq!(properties["views"], json!({"type": "long"}));
    assert_eq!(properties["rating"], json!({"type": "float"}));
    assert_eq!(properties["scores"], json!({"type": "integer"}));
    assert_eq!(properties["sizes"], json!({"type": "short"}));
    assert_eq!(properties["history"], json!({"type": "double"}));
    assert_eq!(properties["grid"], json!({"type": "long"}));
    assert_eq!(properties["links"], json!({"type": "string"}));
    assert_eq!(
        properties["updated"],
        json!({"type": "date", "precision_step": 4})
    );
    Ok(())
}

#[test]
fn test_json_text_round_trip() -> Result<()> {
    let context = common::context();
    context.register::<Gallery>()?;

    let original = gallery();
    let json = context.to_document(&original)?.to_json_string()?;
    let document = Document::from_json_str(&json)?;

    let read: Gallery = context.from_document(&document)?;
    assert_eq!(read, original);
    Ok(())
}

#[test]
fn test_missing_and_single_values() -> Result<()> {
    let context = common::context();
    context.register::<Gallery>()?;

    let document = Document::from_value(json!({
        "title": "winter",
        "tags": "snow",
        "views": "12",
        "homepage": null
    }))?;

    let read: Gallery = context.from_document(&document)?;
    assert_eq!(read.title, "winter");
    assert_eq!(read.tags, HashSet::from(["snow".to_string()]));
    assert_eq!(read.views, 12);
    assert_eq!(read.homepage, None);
    assert!(read.scores.is_empty());
    assert_eq!(read.updated, None);
    Ok(())
}

#[test]
fn test_sub_second_dates() -> Result<()> {
    let context = common::context();
    context.register::<Tweet>()?;

    let tweet = Tweet {
        message: "precise".to_string(),
        date: Utc.timestamp_nanos(1_368_000_000_123_456_789),
        user: "eve".to_string(),
    };
    let document = context.to_document(&tweet)?;
    let read: Tweet = context.from_document(&document)?;
    assert_eq!(read, tweet);
    Ok(())
}

#[test]
fn test_nested_value_object() -> Result<()> {
    let context = common::context();
    context.register::<SimpleEntity>()?;

    let entity = SimpleEntity {
        id: Some("e1".to_string()),
        name: "parent".to_string(),
        ignorefield: "kept".to_string(),
        frenchfield: "Où est la gare".to_string(),
        age: 33,
        password: "secret".to_string(),
        child: Some(Box::new(ChildEntity {
            label: "nested".to_string(),
            weight: 2.5,
            note: "dropped".to_string(),
        })),
    };
    let document = context.to_document(&entity)?;
    assert_eq!(document.get_str("_id"), Some("e1"));

    let read: SimpleEntity = context.from_document(&document)?;
    let expected = SimpleEntity {
        age: 0,
        password: String::new(),
        child: Some(Box::new(ChildEntity {
            note: String::new(),
            ..(**entity.child.as_ref().unwrap()).clone()
        })),
        ..entity.clone()
    };
    assert_eq!(read, expected);
    Ok(())
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Profile {
    nickname: Option<String>,
    age: Option<i32>,
}

impl Describe for Profile {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity()
            .field("nickname", |p| &p.nickname, |p| &mut p.nickname)
            .payload(PayloadOptions::new().null_value("n/a"))
            .field("age", |p| &p.age, |p| &mut p.age)
            .payload(PayloadOptions::new().null_value("0"))
            .build()
    }
}

#[test]
fn test_null_value_stays_in_schema() -> Result<()> {
    let context = common::context();
    context.register::<Profile>()?;

    let schema = context.schema::<Profile>()?.to_json()?;
    assert_eq!(
        schema["profile"]["properties"]["nickname"],
        json!({"type": "string", "null_value": "n/a"})
    );

    let original = Profile::default();
    let document = context.to_document(&original)?;
    assert_eq!(document.get_field("nickname"), Some(&json!(null)));
    assert_eq!(document.get_field("age"), Some(&json!(null)));

    let read: Profile = context.from_document(&document)?;
    assert_eq!(read, original);

    let named = Profile {
        nickname: Some("zed".to_string()),
        age: Some(41),
    };
    let read: Profile = context.from_document(&context.to_document(&named)?)?;
    assert_eq!(read, named);
    Ok(())
}

#[test]
fn test_invalid_value_is_reported() {
    let context = common::context();
    context.register::<Gallery>().unwrap();

    let document = Document::from_value(json!({"rank": "high"})).unwrap();
    match context.from_document::<Gallery>(&document) {
        Err(MapperError::Deserialization { type_path, reason }) => {
            assert_eq!(type_path, std::any::type_name::<Gallery>());
            assert!(reason.contains("rank"));
        }
        other => panic!("unexpected result {other:?}"),
    }
}
