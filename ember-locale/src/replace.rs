/// Replace `{0}`, `{1}`, ... in `template` with the matching argument.
///
/// Placeholders without an argument are left untouched.
pub fn replace_placeholders<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    args.iter()
        .enumerate()
        .fold(template.to_owned(), |text, (index, value)| {
            text.replace(&format!("{{{index}}}"), value.as_ref())
        })
}
