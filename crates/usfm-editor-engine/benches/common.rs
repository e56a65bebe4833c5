// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_usfm_content(chapters: usize) -> String {
    let mut content = String::from("\\id GEN Benchmark\n\\h Genesis\n\\mt1 Genesis");
    for chapter in 1..=chapters {
        content.push_str(&format!("\n\\c {chapter}\n\\s1 Section {chapter}\n\\p"));
        for verse in 1..=30 {
            content.push_str(&format!(
                "\n\\v {verse} And \\nd God\\nd* said, \\wj let there be \\+add light\\+add*\\wj*."
            ));
            if verse % 10 == 0 {
                content.push_str("\\f + \\fr 1.1: \\ft A note\\f*\n\\q1 a line of poetry\n\\q2 and another\n\\p");
            }
        }
    }
    content
}
