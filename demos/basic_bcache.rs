use bcache::Bcache;
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=bcache=debug shows table expansions.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut names = Bcache::new();

    let (main_id, added) = names.insert(b"main").unwrap();
    println!("insert \"main\": id={} added={}", main_id.index(), added);

    let (again, added) = names.insert(b"main").unwrap();
    println!("insert \"main\" again: id={} added={}", again.index(), added);
    assert_eq!(main_id, again);

    for i in 0..20_000 {
        names.insert_str(&format!("symbol_{}", i % 7_500)).unwrap();
    }

    println!("stored \"main\": {:?}", names.get_str(main_id));
    println!("arena bytes: {}", names.memory_used());

    let stdout = std::io::stdout();
    names
        .print_statistics("string cache", &mut stdout.lock())
        .unwrap();
}
