//! Complete end-to-end example: saved response → Document → triples
//!
//! This example demonstrates the full pipeline:
//! 1. Load a saved `analyzeSyntax` response
//! 2. Convert it into a Document of dependency trees
//! 3. Extract subject-verb-complement triples
//!
//! Run with: cargo run --example end_to_end [path/to/response.json[.gz]]

use nlst::google::{AnalyzeSyntaxResponse, Label, active_voice};
use nlst::{VerbTripleOptions, document_from_response, find_triples, find_verb_triples};

fn main() {
    println!("=== nlst: End-to-End Example ===\n");

    let sample = concat!(env!("CARGO_MANIFEST_DIR"), "/data/fox_and_dog.json");
    let path = std::env::args().nth(1).unwrap_or_else(|| sample.to_string());

    // Step 1: Load the response
    println!("📄 Step 1: Loading {}...", path);
    let response = match AnalyzeSyntaxResponse::from_path(&path) {
        Ok(response) => response,
        Err(e) => {
            eprintln!("❌ {}", e);
            return;
        }
    };
    println!(
        "✅ {} tokens, {} sentences, language {:?}\n",
        response.tokens.len(),
        response.sentences.len(),
        response.language
    );

    // Step 2: Build the Document
    println!("🔧 Step 2: Building dependency trees...");
    let doc = match document_from_response(&response) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("❌ {}", e);
            return;
        }
    };
    println!("{}", doc.string_repr(false));

    // Step 3: Extract triples
    println!("🔍 Step 3: Verb triples (active and passive voice)");
    let mut found = 0;
    for triple in find_verb_triples(&doc, VerbTripleOptions::default()) {
        println!("   {:?}", triple.contents());
        found += 1;
    }
    if found == 0 {
        println!("   (none; copular complements are labeled ACOMP, not DOBJ)");
    }

    println!("\n🔍 Copular triples (NSUBJ / VERB / DOBJ, PREP or ACOMP)");
    let copular = active_voice().with_right_label(Label::Acomp.as_str());
    for triple in find_triples(&doc, copular) {
        let (subject, verb, complement) = triple.contents();
        println!("   {} --{}--> {}", subject, verb.to_lowercase(), complement);
    }
}
