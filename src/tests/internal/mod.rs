mod fetcher;
