/// Title-cases `value`: the first letter of every alphabetic run is
/// uppercased and the rest lowercased, so `"b-complex forte"` becomes
/// `"B-Complex Forte"`. Non-letters pass through untouched.
pub(crate) fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_is_alpha = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }
    out
}
