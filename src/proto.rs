tonic::include_proto!("catalog");
