use pom_resolver::default_impl::DefaultDownloader;
use pom_resolver::{Coordinate, ExecutionContext, LoggingErrorSink, Resolver};

fn main() {
    env_logger::init();

    let coordinate = Coordinate::new("com.walmartlabs.concord.plugins.basic", "smtp-tasks", "1.76.1");

    let sink = LoggingErrorSink;
    let ctx = ExecutionContext::new(&sink);
    let downloader = DefaultDownloader;

    let mut resolver = Resolver::new();
    let pom = resolver.resolve(&coordinate, &downloader, &ctx).expect("resolution failed");

    let mut compile_deps: Vec<_> = pom
        .dependencies
        .iter()
        .filter(|dep| dep.scope == pom_resolver::Scope::Compile)
        .collect();
    compile_deps.sort_by(|a, b| a.key.cmp(&b.key));

    for dep in compile_deps {
        println!("{}:{}", dep.key, dep.resolved_version);
    }
}
