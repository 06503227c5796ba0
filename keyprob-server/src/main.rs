use std::sync::Mutex;

use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use keyprob_core::io::list_models;
use keyprob_core::{KeyEvent, KeypressModel, ModelConfig};

/// HTTP host for a keypress prediction model.
///
/// The model is shared behind a single `Mutex`, so key events, training and
/// saves are serialized.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Model name (file `<model-dir>/<name>.json`)
	#[arg(long, default_value = "default")]
	name: String,
	#[arg(long, default_value = "")]
	description: String,
	#[arg(long, default_value = ModelConfig::DEFAULT_MODEL_DIR)]
	model_dir: String,
	/// Ignored when the model file already exists
	#[arg(long, default_value_t = ModelConfig::DEFAULT_MAX_DEPTH)]
	max_depth: usize,
	/// Ignored when the model file already exists
	#[arg(long, default_value_t = ModelConfig::DEFAULT_MIN_ACCEPTABLE_DATAPOINTS)]
	min_datapoints: u64,
	/// Learn from the key events received on `/v1/key`
	#[arg(long)]
	train_keys: bool,
	#[arg(long, default_value = "127.0.0.1")]
	host: String,
	#[arg(long, default_value_t = 5000)]
	port: u16,
}

/// Query parameters for the `/v1/key` endpoint
#[derive(Deserialize)]
struct KeyQuery {
	name: String,
}

/// Query parameters for the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictQuery {
	context: Option<String>,
}

#[derive(Serialize)]
struct ModelInfo<'a> {
	name: &'a str,
	description: &'a str,
	max_depth: usize,
	min_acceptable_datapoints: u64,
	sequences: usize,
	rolling_context: String,
	training_with_keys: bool,
}

struct SharedData {
	model: KeypressModel,
}

/// Locks the shared model or bails out with a 500.
macro_rules! lock_or_500 {
	($data:expr) => {
		match $data.lock() {
			Ok(m) => m,
			Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
		}
	};
}

/// HTTP PUT endpoint `/v1/key`
///
/// Feeds one key event to the model and returns the prediction for the
/// updated rolling context. Unrecognized keys leave the model unchanged.
#[put("/v1/key")]
async fn put_key(data: web::Data<Mutex<SharedData>>, query: web::Query<KeyQuery>) -> impl Responder {
	let mut shared_data = lock_or_500!(data);
	shared_data.model.on_key_event(&KeyEvent::new(query.name.as_str()));
	HttpResponse::Ok().json(shared_data.model.current_prediction())
}

/// HTTP GET endpoint `/v1/predict`
///
/// Resolves the distribution for `context`, or for the rolling context when
/// none is given.
#[get("/v1/predict")]
async fn get_predict(data: web::Data<Mutex<SharedData>>, query: web::Query<PredictQuery>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match &query.context {
		Some(context) => HttpResponse::Ok().json(shared_data.model.probabilities_for(context)),
		None => HttpResponse::Ok().json(shared_data.model.current_prediction()),
	}
}

#[get("/v1/context")]
async fn get_context(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	HttpResponse::Ok().body(shared_data.model.rolling_context())
}

/// HTTP PUT endpoint `/v1/train`
///
/// Trains the model on the request body (plain text).
#[put("/v1/train")]
async fn put_train(data: web::Data<Mutex<SharedData>>, body: String) -> impl Responder {
	if body.is_empty() {
		return HttpResponse::BadRequest().body("Missing training text");
	}
	let mut shared_data = lock_or_500!(data);
	let transitions: usize = body.lines().map(|line| shared_data.model.train_on_text(line)).sum();
	info!("Trained on {} transitions from request", transitions);
	HttpResponse::Ok().body(format!("{transitions}"))
}

#[put("/v1/save")]
async fn put_save(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match shared_data.model.persist() {
		Ok(()) => HttpResponse::Ok().body("Model saved successfully"),
		Err(e) => {
			error!("Save failed: {e}");
			HttpResponse::InternalServerError().body(format!("Failed to save model: {e}"))
		}
	}
}

#[get("/v1/models")]
async fn get_models(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	match list_models(&shared_data.model.config().model_dir) {
		Ok(models) => HttpResponse::Ok().body(models.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list models"),
	}
}

#[get("/v1/info")]
async fn get_info(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = lock_or_500!(data);
	let model = &shared_data.model;
	HttpResponse::Ok().json(ModelInfo {
		name: model.name(),
		description: model.description(),
		max_depth: model.max_depth(),
		min_acceptable_datapoints: model.config().min_acceptable_datapoints,
		sequences: model.store().len(),
		rolling_context: model.rolling_context(),
		training_with_keys: model.is_training_with_keys(),
	})
}

/// Main entry point for the server.
///
/// Loads (or creates) the model, wraps it in a `Mutex`, serves until
/// interrupted, then saves the model one last time.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let config = ModelConfig::new(args.name)
		.with_description(args.description)
		.with_model_dir(&args.model_dir)
		.with_max_depth(args.max_depth)
		.with_min_acceptable_datapoints(args.min_datapoints);

	let mut model = match KeypressModel::load_or_create(config) {
		Ok(model) => model,
		Err(e) => {
			error!("Failed to load model: {e}");
			return Err(std::io::Error::other(e));
		}
	};
	if args.train_keys {
		model.enable_keystroke_training();
	}
	model.subscribe_to_predictions(|distribution| {
		debug!("Prediction: {:?}", distribution.top(3));
	});

	let shared_data = SharedData { model };
	let shared_model = web::Data::new(Mutex::new(shared_data));
	let server_model = shared_model.clone();

	info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.app_data(server_model.clone())
			.service(put_key)
			.service(get_predict)
			.service(get_context)
			.service(put_train)
			.service(put_save)
			.service(get_models)
			.service(get_info)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await?;

	let shared_data = shared_model
		.lock()
		.map_err(|_| std::io::Error::other("Model lock poisoned"))?;
	shared_data.model.persist().map_err(std::io::Error::other)
}
