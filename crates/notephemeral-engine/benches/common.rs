// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
#[allow(dead_code)]
pub fn generate_note(sections: usize) -> String {
    let mut content = String::new();
    for section in 0..sections {
        let hashes = "#".repeat(section % 6 + 1);
        content.push_str(&format!("{hashes} Section {section}\n\n"));
        content.push_str(&format!(
            "Notes for section {section}, see https://example.com/notes/{section} and\n\
             the follow-up at https://tracker.example.org/issues/{section}.\n\
             #tag-{section} closes the list\n\n"
        ));
    }
    content
}
