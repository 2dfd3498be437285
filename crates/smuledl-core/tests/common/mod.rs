pub mod mock_site;
