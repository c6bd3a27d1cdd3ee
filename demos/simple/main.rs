use reddit_objects::{LazyObject, Session, SessionConfig, Subreddit};

pub fn main() {
    env_logger::init();

    let session = Session::new(SessionConfig::default()).unwrap();

    // Nothing is fetched yet.
    let subreddit = LazyObject::<Subreddit>::deferred(&session, "rust").unwrap();
    println!("Subreddit: {}", subreddit);

    // Reading an attribute we don't have fetches the about page.
    match subreddit.subscribers() {
        Ok(subscribers) => println!("Subscribers: {}", subscribers),
        Err(err) => println!("Unable to fetch subreddit: {}", err),
    }
    println!("Fullname: {:?}", subreddit.fullname());
}
