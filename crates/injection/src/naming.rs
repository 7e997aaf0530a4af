/// Registry key for a type: the simple name with its first character
/// lower-cased (`GreeterImpl` → `greeterImpl`).
pub fn bean_name(simple_name: &str) -> String {
    let mut chars = simple_name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
