//! Name-keyed string generation.
//!
//! The semantic table is data-driven: an ordered list of keyword sets and
//! generator functions evaluated top to bottom, so a new category is an
//! addition, not an edit. More specific keywords (username, firstname) sit
//! above the generic ones (name) they would otherwise shadow.

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StreetName, ZipCode};
use fake::faker::company::en::{CompanyName, Profession};
use fake::faker::internet::en::{IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use rand::seq::IndexedRandom;
use rand::{Rng, RngCore};
use serde_json::Value;

use seedforge_core::{FieldDefinition, FieldKind};

use crate::values::{GenerationContext, GeneratorRegistry, ValueStrategy, placeholder};

type StringGen = fn(&mut dyn RngCore) -> Value;

struct SemanticCategory {
    keywords: &'static [&'static str],
    generate: StringGen,
}

static CATEGORIES: &[SemanticCategory] = &[
    SemanticCategory { keywords: &["email"], generate: gen_email },
    SemanticCategory { keywords: &["username", "login", "nickname"], generate: gen_username },
    SemanticCategory { keywords: &["firstname", "first_name"], generate: gen_first_name },
    SemanticCategory { keywords: &["lastname", "last_name", "surname"], generate: gen_last_name },
    SemanticCategory { keywords: &["name"], generate: gen_name },
    SemanticCategory { keywords: &["password", "secret"], generate: gen_password },
    SemanticCategory { keywords: &["phone", "mobile", "tel"], generate: gen_phone },
    SemanticCategory { keywords: &["postal", "zip"], generate: gen_zip },
    SemanticCategory { keywords: &["address", "street"], generate: gen_address },
    SemanticCategory { keywords: &["city"], generate: gen_city },
    SemanticCategory { keywords: &["country"], generate: gen_country },
    SemanticCategory { keywords: &["company", "organization", "employer"], generate: gen_company },
    SemanticCategory { keywords: &["job", "profession", "occupation"], generate: gen_profession },
    SemanticCategory { keywords: &["title", "subject", "headline"], generate: gen_title },
    SemanticCategory { keywords: &["description", "summary", "bio"], generate: gen_description },
    SemanticCategory { keywords: &["content", "body", "text", "message"], generate: gen_content },
    SemanticCategory { keywords: &["image", "avatar", "photo", "picture"], generate: gen_image_url },
    SemanticCategory { keywords: &["url", "link", "website"], generate: gen_url },
    SemanticCategory { keywords: &["color", "colour"], generate: gen_color },
    SemanticCategory { keywords: &["slug"], generate: gen_slug },
    SemanticCategory { keywords: &["locale", "language"], generate: gen_locale },
    SemanticCategory { keywords: &["ip"], generate: gen_ip },
    SemanticCategory { keywords: &["uuid", "identifier", "key", "code", "token"], generate: gen_token },
    SemanticCategory { keywords: &["comment"], generate: gen_comment },
    SemanticCategory { keywords: &["status", "state"], generate: gen_status },
    SemanticCategory { keywords: &["category", "kind", "type"], generate: gen_category },
    SemanticCategory { keywords: &["tag", "label"], generate: gen_word },
    SemanticCategory { keywords: &["product", "item"], generate: gen_product },
];

pub struct StringStrategy;

impl ValueStrategy for StringStrategy {
    fn id(&self) -> &'static str {
        "value.string"
    }

    fn can_generate(&self, field: &FieldDefinition, _ctx: &GenerationContext<'_>) -> bool {
        field.kind == FieldKind::String && !field.is_array
    }

    fn generate(
        &self,
        field: &FieldDefinition,
        ctx: &GenerationContext<'_>,
        _registry: &GeneratorRegistry,
        rng: &mut dyn RngCore,
    ) -> Value {
        if !ctx.realistic {
            return placeholder(field, ctx);
        }
        if let Some(values) = field.enum_values.as_deref().filter(|v| !v.is_empty()) {
            let picked = values.choose(rng).cloned().unwrap_or_default();
            return Value::String(picked);
        }

        let lower = field.name.to_lowercase();
        for category in CATEGORIES {
            if category.keywords.iter().any(|kw| lower.contains(kw)) {
                return (category.generate)(rng);
            }
        }
        // Nothing matched: short lorem fallback.
        Value::String(Words(2..5).fake_with_rng::<Vec<String>, _>(rng).join(" "))
    }
}

fn gen_email(rng: &mut dyn RngCore) -> Value {
    Value::String(SafeEmail().fake_with_rng(rng))
}

fn gen_username(rng: &mut dyn RngCore) -> Value {
    Value::String(Username().fake_with_rng(rng))
}

fn gen_first_name(rng: &mut dyn RngCore) -> Value {
    Value::String(FirstName().fake_with_rng(rng))
}

fn gen_last_name(rng: &mut dyn RngCore) -> Value {
    Value::String(LastName().fake_with_rng(rng))
}

fn gen_name(rng: &mut dyn RngCore) -> Value {
    Value::String(Name().fake_with_rng(rng))
}

fn gen_password(rng: &mut dyn RngCore) -> Value {
    Value::String(Password(10..16).fake_with_rng(rng))
}

fn gen_phone(rng: &mut dyn RngCore) -> Value {
    Value::String(PhoneNumber().fake_with_rng(rng))
}

fn gen_zip(rng: &mut dyn RngCore) -> Value {
    Value::String(ZipCode().fake_with_rng(rng))
}

fn gen_address(rng: &mut dyn RngCore) -> Value {
    let street: String = StreetName().fake_with_rng(rng);
    let number: u32 = rng.random_range(1..=9999);
    Value::String(format!("{street}, {number}"))
}

fn gen_city(rng: &mut dyn RngCore) -> Value {
    Value::String(CityName().fake_with_rng(rng))
}

fn gen_country(rng: &mut dyn RngCore) -> Value {
    Value::String(CountryName().fake_with_rng(rng))
}

fn gen_company(rng: &mut dyn RngCore) -> Value {
    Value::String(CompanyName().fake_with_rng(rng))
}

fn gen_profession(rng: &mut dyn RngCore) -> Value {
    Value::String(Profession().fake_with_rng(rng))
}

fn gen_title(rng: &mut dyn RngCore) -> Value {
    let words: Vec<String> = Words(2..6).fake_with_rng(rng);
    Value::String(words.join(" "))
}

fn gen_description(rng: &mut dyn RngCore) -> Value {
    Value::String(Sentence(8..16).fake_with_rng(rng))
}

fn gen_content(rng: &mut dyn RngCore) -> Value {
    Value::String(Paragraph(2..5).fake_with_rng(rng))
}

fn gen_url(rng: &mut dyn RngCore) -> Value {
    let slug: String = Word().fake_with_rng(rng);
    Value::String(format!("https://example.com/{slug}"))
}

fn gen_image_url(rng: &mut dyn RngCore) -> Value {
    let slug: String = Word().fake_with_rng(rng);
    Value::String(format!("https://example.com/images/{slug}.jpg"))
}

fn gen_color(rng: &mut dyn RngCore) -> Value {
    const COLORS: &[&str] = &[
        "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6",
    ];
    Value::String(COLORS.choose(rng).copied().unwrap_or("#000000").to_string())
}

fn gen_slug(rng: &mut dyn RngCore) -> Value {
    let words: Vec<String> = Words(2..4).fake_with_rng(rng);
    Value::String(words.join("-").to_lowercase())
}

fn gen_locale(rng: &mut dyn RngCore) -> Value {
    const LOCALES: &[&str] = &["en-US", "en-GB", "pt-BR", "de-DE", "fr-FR", "es-ES", "ja-JP"];
    Value::String(LOCALES.choose(rng).copied().unwrap_or("en-US").to_string())
}

fn gen_ip(rng: &mut dyn RngCore) -> Value {
    Value::String(IPv4().fake_with_rng(rng))
}

fn gen_token(rng: &mut dyn RngCore) -> Value {
    let mut bytes = [0_u8; 8];
    rng.fill_bytes(&mut bytes);
    Value::String(hex::encode(bytes))
}

fn gen_comment(rng: &mut dyn RngCore) -> Value {
    Value::String(Sentence(4..10).fake_with_rng(rng))
}

fn gen_status(rng: &mut dyn RngCore) -> Value {
    const STATUSES: &[&str] = &["active", "inactive", "pending", "archived"];
    Value::String(STATUSES.choose(rng).copied().unwrap_or("active").to_string())
}

fn gen_category(rng: &mut dyn RngCore) -> Value {
    gen_word(rng)
}

fn gen_word(rng: &mut dyn RngCore) -> Value {
    Value::String(Word().fake_with_rng(rng))
}

fn gen_product(rng: &mut dyn RngCore) -> Value {
    let words: Vec<String> = Words(2..4).fake_with_rng(rng);
    let mut name = words.join(" ");
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    Value::String(name)
}
