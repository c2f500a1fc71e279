use serde_json::{Value, json};

use crate::error::{Result, SpriteSheetError};
use crate::model::{SheetMetadata, SpriteRecord};
use crate::packer::{Space, SpritePacker};
use crate::sprite::Sprite;

impl Space {
    /// Appends one record per occupied node of this subtree. Coordinates are
    /// the sprite's interior (footprint inset by its padding), normalized by
    /// the canvas size.
    pub fn collect_records(
        &self,
        sprites: &[Sprite],
        canvas_w: u32,
        canvas_h: u32,
        out: &mut Vec<SpriteRecord>,
    ) {
        self.for_each_occupied(&mut |extent, index| {
            let sprite = &sprites[index];
            let interior = extent.inset(sprite.padding());
            out.push(SpriteRecord::new(sprite.name(), interior, canvas_w, canvas_h));
        });
    }
}

impl SpritePacker {
    /// Derives the coordinate map of the packed sheet.
    pub fn metadata(&self) -> Result<SheetMetadata> {
        let root = self.root().ok_or(SpriteSheetError::NotPacked)?;
        let mut sprites = Vec::with_capacity(self.sprites().len());
        root.collect_records(self.sprites(), self.width(), self.height(), &mut sprites);
        sprites.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(SheetMetadata {
            app: "spritesheet".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            width: self.width(),
            height: self.height(),
            padding: self.config().padding,
            sprites,
        })
    }
}

/// Render the coordinate map as a Lua table keyed by sprite name.
///
/// ```text
/// {
///     hero =
///     {
///         X = 2,
///         ...
///         normH = 0.5
///     },
///     ...
/// }
/// ```
/// Entries are comma separated with no separator after the last one. Names
/// that are not plain Lua identifiers are written as `["name"]`.
pub fn to_lua(meta: &SheetMetadata) -> String {
    let mut s = String::from("{\n");
    let last = meta.sprites.len().saturating_sub(1);
    for (i, r) in meta.sprites.iter().enumerate() {
        s.push_str(&format!(
            "\t{} =\n\t{{\n\t\tX = {},\n\t\tY = {},\n\t\tW = {},\n\t\tH = {},\n\t\tnormX = {},\n\t\tnormY = {},\n\t\tnormW = {},\n\t\tnormH = {}\n\t}}",
            lua_key(&r.name),
            r.x,
            r.y,
            r.w,
            r.h,
            r.norm_x,
            r.norm_y,
            r.norm_w,
            r.norm_h,
        ));
        if i < last {
            s.push(',');
        }
        s.push('\n');
    }
    s.push_str("}\n");
    s
}

const LUA_KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "goto", "if", "in",
    "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
];

fn lua_key(name: &str) -> String {
    let mut chars = name.chars();
    let ident = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if ident && !LUA_KEYWORDS.contains(&name) {
        name.to_string()
    } else {
        format!("[\"{}\"]", lua_escape(name))
    }
}

/// Body of a double-quoted Lua string. Control characters become `\ddd`
/// byte escapes (three digits, so a following digit cannot extend them).
fn lua_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c if c.is_control() => {
                let mut buf = [0u8; 4];
                for b in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("\\{b:03}"));
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Sprites keyed by name plus sheet-level meta.
/// Shape: `{ sprites: { name: { X, Y, W, H, normX, normY, normW, normH } }, meta }`.
/// `image` is the file name of the sheet, when known.
pub fn to_json_hash(meta: &SheetMetadata, image: Option<&str>) -> Value {
    let mut sprites = serde_json::Map::new();
    for r in &meta.sprites {
        sprites.insert(
            r.name.clone(),
            json!({
                "X": r.x,
                "Y": r.y,
                "W": r.w,
                "H": r.h,
                "normX": r.norm_x,
                "normY": r.norm_y,
                "normW": r.norm_w,
                "normH": r.norm_h,
            }),
        );
    }
    let mut m = json!({
        "app": meta.app,
        "version": meta.version,
        "size": {"w": meta.width, "h": meta.height},
        "padding": meta.padding,
    });
    if let (Some(name), Some(obj)) = (image, m.as_object_mut()) {
        obj.insert("image".into(), Value::String(name.to_string()));
    }
    json!({ "sprites": sprites, "meta": m })
}

/// Pretty JSON text of [`to_json_hash`].
pub fn to_json_string(meta: &SheetMetadata, image: Option<&str>) -> Result<String> {
    serde_json::to_string_pretty(&to_json_hash(meta, image))
        .map_err(|e| SpriteSheetError::Encode(e.to_string()))
}
