use boiler_inspection_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("boiler inspection error: {err}");
        std::process::exit(1);
    }
}
