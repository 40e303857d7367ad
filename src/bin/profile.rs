use mazepath::app;

fn main() -> std::io::Result<()> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok());
    app::profile(u8::MAX, u8::MAX, num_iters)
}
