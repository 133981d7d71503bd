fn main() {
    if let Err(err) = relgraph_layout::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
