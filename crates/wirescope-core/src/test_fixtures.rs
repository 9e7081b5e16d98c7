//! Shared test schemas: a small blog universe (User/Post/Tag) and a
//! self-referential tree, mirroring the shapes the engine is expected
//! to handle in anger.

use crate::{
    model::{Field, FieldKind, ModelSchema},
    pattern::Pattern,
    schema::Schema,
    scope::Scope,
    validate::Validator,
    value::Value,
};

/// Map literal helper; panics on duplicate keys, which is a test bug.
pub(crate) fn obj(entries: Vec<(&str, Value)>) -> Value {
    Value::from_entries(entries).expect("test objects use unique keys")
}

pub(crate) fn user_model() -> ModelSchema {
    ModelSchema::build("User")
        .field(Field::new("id", FieldKind::Uint))
        .field(Field::new("name", FieldKind::Text).validator(Validator::non_empty()))
        .field(Field::new("email", FieldKind::Text))
        .finish()
        .expect("user model should build")
}

pub(crate) fn post_model() -> ModelSchema {
    ModelSchema::build("Post")
        .field(Field::new("id", FieldKind::Uint))
        .field(Field::new("title", FieldKind::Text).validator(Validator::non_empty()))
        .field(Field::new("author", FieldKind::nested("User")))
        .field(Field::new("tags", FieldKind::nested_many("Tag")))
        .finish()
        .expect("post model should build")
}

pub(crate) fn tag_model() -> ModelSchema {
    ModelSchema::build("Tag")
        .field(Field::new("id", FieldKind::Uint))
        .field(Field::new("label", FieldKind::Text).validator(Validator::non_empty()))
        .finish()
        .expect("tag model should build")
}

/// Blog schema: full "default" scopes everywhere, a "public" projection
/// on User, and a "list" scope that locks email down to read-only.
pub(crate) fn blog_schema() -> Schema {
    Schema::build()
        .model(user_model())
        .model(post_model())
        .model(tag_model())
        .scope(Scope::new("default", "User"))
        .scope(Scope::new("default", "Post"))
        .scope(Scope::new("default", "Tag"))
        .scope(Scope::new("public", "User").pattern(Pattern::include_only(&["id", "name"])))
        .scope(Scope::new("list", "User").pattern(Pattern::mark_readonly(&["email"])))
        .finish()
        .expect("blog schema should build")
}

/// Self-referential tree: `next` and `children` both point back at Node.
pub(crate) fn tree_schema() -> Schema {
    let node = ModelSchema::build("Node")
        .field(Field::new("id", FieldKind::Uint))
        .field(Field::new("label", FieldKind::Text))
        .field(Field::new("next", FieldKind::nested("Node")))
        .field(Field::new("children", FieldKind::nested_many("Node")))
        .finish()
        .expect("node model should build");

    Schema::build()
        .model(node)
        .scope(Scope::new("default", "Node"))
        .finish()
        .expect("tree schema should build")
}
