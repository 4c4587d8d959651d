/// Replace the final extension of `original` with `.webp`.
///
/// Only a trailing `.ext` whose extension is non-empty and free of `/` and
/// `.` is stripped; anything else keeps its full name and gains `.webp`.
pub fn webp_filename(original: &str) -> String {
    let base = match original.rfind('.') {
        Some(dot) => {
            let extension = &original[dot + 1..];
            if !extension.is_empty() && !extension.contains('/') {
                &original[..dot]
            } else {
                original
            }
        }
        None => original,
    };

    format!("{}.webp", base)
}
