use std::fs;

use uuid::Uuid;

use seedforge_analyze::{ModelScanner, ScanOptions, StrategyRegistry};
use seedforge_core::{FieldKind, validate_structure};

const USER_SCHEMA: &str = r#"
import mongoose, { Schema, Document } from 'mongoose';

export interface IUser extends Document {
  name: string;
  email: string;
  age?: number;
  role: 'admin' | 'editor' | 'viewer';
  createdAt: Date;
}

const UserSchema = new Schema({
  name: { type: String, required: true },
  email: { type: String, required: true, unique: true },
  age: { type: Number },
  role: { type: String, enum: ['admin', 'editor', 'viewer'], default: 'viewer' },
}, { timestamps: true });

export default mongoose.model<IUser>('User', UserSchema);
"#;

const POST_SCHEMA: &str = r#"
const PostSchema = new mongoose.Schema({
  title: { type: String, required: true },
  body: String,
  published: Boolean,
  author: { type: mongoose.Schema.Types.ObjectId, ref: 'User', required: true },
  likes: [{ type: mongoose.Schema.Types.ObjectId, ref: 'User' }],
  tags: [String],
  viewCount: Number,
});
"#;

const INLINE_SCHEMA: &str = r#"
const schema = new Schema({
  label: String,
  position: Number,
  active: Boolean,
});
"#;

const JOI_SCHEMA: &str = r#"
const contactSchema = Joi.object({
  fullName: Joi.string().required(),
  email: Joi.string().email().required(),
  age: Joi.number().min(0),
  channel: Joi.string().valid('sms', 'email', 'push'),
  optIn: Joi.boolean(),
});
"#;

#[test]
fn interface_pass_wins_and_enums_backfill() {
    let registry = StrategyRegistry::default();
    let structure = registry.analyze_model("User", USER_SCHEMA);

    assert!(validate_structure(&structure).is_ok());
    let names: Vec<&str> = structure.fields.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"name"));
    assert!(names.contains(&"email"));
    assert!(names.contains(&"role"));

    let age = structure.field("age").expect("age extracted");
    assert_eq!(age.kind, FieldKind::Number);
    assert!(!age.required, "optional marker must clear required");

    let role = structure.field("role").expect("role extracted");
    assert!(role.is_enum);
    assert_eq!(
        structure.enums.get("role").map(Vec::len),
        Some(3),
        "enum values back-filled from union literal"
    );
}

#[test]
fn interface_fields_pick_up_unique_from_the_schema_block() {
    let registry = StrategyRegistry::default();
    let structure = registry.analyze_model("User", USER_SCHEMA);

    let email = structure.field("email").expect("email extracted");
    assert!(email.unique, "unique: true must carry over from the schema block");
    let name = structure.field("name").expect("name extracted");
    assert!(!name.unique);
}

#[test]
fn schema_block_pass_extracts_references() {
    let registry = StrategyRegistry::default();
    let structure = registry.analyze_model("Post", POST_SCHEMA);

    assert!(validate_structure(&structure).is_ok());
    assert!(!structure.is_empty());

    let author = structure.field("author").expect("author extracted");
    assert!(author.is_reference);
    assert_eq!(author.ref_model.as_deref(), Some("User"));

    let likes = structure.field("likes").expect("likes extracted");
    assert!(likes.is_array);
    assert!(likes.is_reference);

    let tags = structure.field("tags").expect("tags extracted");
    assert_eq!(tags.kind, FieldKind::Array);
    assert_eq!(tags.item_kind, Some(FieldKind::String));

    assert_eq!(structure.references.len(), 2);
    assert!(structure.references.iter().all(|r| r.model == "User"));
}

#[test]
fn inline_shorthand_is_still_extracted() {
    let registry = StrategyRegistry::default();
    let structure = registry.analyze_model("Widget", INLINE_SCHEMA);

    assert_eq!(structure.fields.len(), 3);
    assert_eq!(structure.field("label").unwrap().kind, FieldKind::String);
    assert_eq!(structure.field("position").unwrap().kind, FieldKind::Number);
    assert_eq!(structure.field("active").unwrap().kind, FieldKind::Boolean);
}

#[test]
fn joi_fallback_handles_validator_only_sources() {
    let registry = StrategyRegistry::default();
    let structure = registry.analyze_model("Contact", JOI_SCHEMA);

    assert!(!structure.is_empty());
    let full_name = structure.field("fullName").expect("fullName extracted");
    assert!(full_name.required);

    let channel = structure.field("channel").expect("channel extracted");
    assert!(channel.is_enum);
    assert_eq!(structure.enums.get("channel").map(Vec::len), Some(3));

    let opt_in = structure.field("optIn").expect("optIn extracted");
    assert_eq!(opt_in.kind, FieldKind::Boolean);
    assert!(!opt_in.required);
}

#[test]
fn well_formed_sources_always_yield_fields() {
    let registry = StrategyRegistry::default();
    for (name, source) in [
        ("User", USER_SCHEMA),
        ("Post", POST_SCHEMA),
        ("Widget", INLINE_SCHEMA),
        ("Contact", JOI_SCHEMA),
    ] {
        let structure = registry.analyze_model(name, source);
        assert!(
            !structure.fields.is_empty(),
            "{name} should produce at least one field"
        );
    }
}

#[test]
fn scanner_discovers_and_analyzes_models() {
    let dir = std::env::temp_dir().join(format!("seedforge_scan_{}", Uuid::new_v4()));
    fs::create_dir_all(dir.join("user")).expect("mkdir");
    fs::write(dir.join("user/user.schema.ts"), USER_SCHEMA).expect("write user");
    fs::write(dir.join("post.model.ts"), POST_SCHEMA).expect("write post");
    fs::write(dir.join("helpers.ts"), "export const noop = () => {};").expect("write helper");

    let scanner = ModelScanner::new(ScanOptions::new(&dir));
    let models = scanner.list_available_models().expect("scan");
    let names: Vec<&str> = models.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Post", "User"], "helper file must be skipped");

    let info = scanner.get_model_info("user").expect("info");
    assert_eq!(info.structure.name, "User");
    assert!(!info.structure.is_empty());

    fs::remove_dir_all(&dir).ok();
}
