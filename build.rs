use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

fn hash_file(path: &Path) -> String {
    let content = fs::read(path).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())[..8].to_string()
}

fn main() {
    println!("cargo:rerun-if-changed=static/js/lib.js");
    println!("cargo:rerun-if-changed=templates/");

    // Hash static assets for cache busting
    let lib_js_hash = hash_file(Path::new("static/js/lib.js"));

    let out_dir = std::env::var("OUT_DIR").unwrap();
    fs::write(
        Path::new(&out_dir).join("asset_hashes.rs"),
        format!(
            r#"/// Hash of lib.js for cache busting
pub const LIB_JS_HASH: &str = "{}";"#,
            lib_js_hash
        ),
    )
    .unwrap();
}
