mod crawl_tests;
mod export_tests;
