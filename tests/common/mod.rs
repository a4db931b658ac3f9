//! Mapped types shared by the integration tests.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use docmapper::prelude::*;
use url::Url;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A root entity with a date displayed under another name.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tweet {
    pub message: String,
    pub date: DateTime<Utc>,
    pub user: String,
}

impl Describe for Tweet {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity()
            .field("message", |t| &t.message, |t| &mut t.message)
            .field("date", |t| &t.date, |t| &mut t.date)
            .schema(SchemaOptions::new().name("post_date"))
            .field("user", |t| &t.user, |t| &mut t.user)
            .build()
    }
}

pub trait Contact: Entity {}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct EmailContact {
    pub email: String,
    pub verified: bool,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PhoneContact {
    pub number: String,
    pub country_code: i16,
}

impl Contact for EmailContact {}
impl Contact for PhoneContact {}

impl Describe for EmailContact {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .field("email", |c| &c.email, |c| &mut c.email)
            .schema(SchemaOptions::new().index(IndexMode::NotAnalyzed))
            .field("verified", |c| &c.verified, |c| &mut c.verified)
            .payload(PayloadOptions::new())
            .build()
    }
}

impl Describe for PhoneContact {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .field("number", |c| &c.number, |c| &mut c.number)
            .payload(PayloadOptions::new().name("phone"))
            .field("country_code", |c| &c.country_code, |c| &mut c.country_code)
            .payload(PayloadOptions::new())
            .build()
    }
}

polymorphic!(dyn Contact => EmailContact, PhoneContact);

/// A root entity with an alias and polymorphic nested objects.
#[derive(Debug, Default)]
pub struct User {
    pub id: Option<String>,
    pub name: String,
    pub main_contact: Option<Box<dyn Contact>>,
    pub contacts: Vec<Box<dyn Contact>>,
}

impl Describe for User {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity_with(RootOptions::new().alias("users"))
            .field("id", |u| &u.id, |u| &mut u.id)
            .schema(SchemaOptions::new().name("_id"))
            .field("name", |u| &u.name, |u| &mut u.name)
            .field("main_contact", |u| &u.main_contact, |u| &mut u.main_contact)
            .field("contacts", |u| &u.contacts, |u| &mut u.contacts)
            .build()
    }
}

/// A root entity exercising schema options and exclusions.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SimpleEntity {
    pub id: Option<String>,
    pub name: String,
    pub ignorefield: String,
    pub frenchfield: String,
    pub age: i32,
    pub password: String,
    pub child: Option<Box<ChildEntity>>,
}

impl Describe for SimpleEntity {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity()
            .field("id", |e| &e.id, |e| &mut e.id)
            .schema(SchemaOptions::new().name("_id"))
            .field("name", |e| &e.name, |e| &mut e.name)
            .field("ignorefield", |e| &e.ignorefield, |e| &mut e.ignorefield)
            .schema(SchemaOptions::new().index(IndexMode::No))
            .field("frenchfield", |e| &e.frenchfield, |e| &mut e.frenchfield)
            .schema(
                SchemaOptions::new()
                    .index(IndexMode::NotAnalyzed)
                    .analyzer("french"),
            )
            .read_only("age", |e| &e.age)
            .field("password", |e| &e.password, |e| &mut e.password)
            .exclude()
            .schema(SchemaOptions::new().store(true))
            .field("child", |e| &e.child, |e| &mut e.child)
            .build()
    }
}

/// A value type only ever nested inside another type.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChildEntity {
    pub label: String,
    pub weight: f64,
    pub note: String,
}

impl Describe for ChildEntity {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .field("label", |c| &c.label, |c| &mut c.label)
            .schema(SchemaOptions::new().boost(2.0))
            .field("weight", |c| &c.weight, |c| &mut c.weight)
            .payload(PayloadOptions::new().null_value("0"))
            .field("note", |c| &c.note, |c| &mut c.note)
            .build()
    }
}

/// A self-referencing root entity.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub next: Option<Box<Node>>,
}

impl Describe for Node {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity()
            .field("label", |n| &n.label, |n| &mut n.label)
            .field("next", |n| &n.next, |n| &mut n.next)
            .build()
    }
}

/// A root entity carrying every supported container and scalar.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Gallery {
    pub title: String,
    pub published: bool,
    pub views: i64,
    pub rank: i32,
    pub rating: f32,
    pub scores: Box<[i32]>,
    pub tags: HashSet<String>,
    pub sizes: BTreeSet<i16>,
    pub history: VecDeque<f64>,
    pub grid: Vec<Vec<i64>>,
    pub links: Vec<Url>,
    pub homepage: Option<Url>,
    pub updated: Option<DateTime<Utc>>,
}

impl Describe for Gallery {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::builder::<Self>()
            .root_entity()
            .field("title", |g| &g.title, |g| &mut g.title)
            .field("published", |g| &g.published, |g| &mut g.published)
            .field("views", |g| &g.views, |g| &mut g.views)
            .field("rank", |g| &g.rank, |g| &mut g.rank)
            .field("rating", |g| &g.rating, |g| &mut g.rating)
            .field("scores", |g| &g.scores, |g| &mut g.scores)
            .field("tags", |g| &g.tags, |g| &mut g.tags)
            .field("sizes", |g| &g.sizes, |g| &mut g.sizes)
            .field("history", |g| &g.history, |g| &mut g.history)
            .field("grid", |g| &g.grid, |g| &mut g.grid)
            .field("links", |g| &g.links, |g| &mut g.links)
            .field("homepage", |g| &g.homepage, |g| &mut g.homepage)
            .field("updated", |g| &g.updated, |g| &mut g.updated)
            .schema(SchemaOptions::new().precision_step(4))
            .build()
    }
}

pub fn context() -> ObjectContext {
    init_logger();
    ObjectContext::new()
}
