/// Fixed embedded training corpus for `forest::train` (see `training_data()` in
/// `forest.rs`): 48 samples of (36-feature ligand-element x receptor-element
/// contact-count vector, pKd). Synthetic but structured -- each row's pKd
/// correlates with total contact count plus noise, so best-split training has
/// real signal to find.
const RAW_TRAINING_SET: [(f64, [f64; 36]); 48] = [
    (6.946, [0.0, 0.0, 33.7, 0.0, 26.4, 0.0, 31.2, 0.0, 0.0, 30.9, 10.9, 7.6, 21.9, 0.0, 11.7, 3.9, 5.5, 0.0, 20.2, 23.2, 5.5, 1.6, 0.0, 0.0, 0.0, 0.0, 25.0, 21.8, 30.5, 0.0, 27.9, 2.0, 19.9, 0.0, 0.0, 0.0]),
    (8.852, [11.6, 7.4, 0.0, 0.0, 0.0, 14.5, 1.5, 33.0, 27.8, 0.0, 37.4, 5.2, 0.0, 0.0, 33.9, 14.8, 6.3, 0.0, 37.8, 21.4, 0.0, 0.0, 30.6, 26.8, 24.4, 0.0, 24.2, 37.9, 9.7, 13.9, 0.0, 35.8, 10.5, 0.0, 29.6, 0.0]),
    (8.939, [19.7, 26.5, 0.2, 19.8, 0.0, 0.0, 23.3, 15.9, 37.6, 5.5, 0.0, 0.0, 0.0, 0.0, 18.8, 0.0, 28.0, 6.7, 0.0, 0.0, 37.1, 13.2, 24.8, 0.0, 11.6, 0.0, 15.1, 26.5, 37.1, 0.0, 0.0, 12.2, 38.8, 34.8, 0.6, 26.3]),
    (8.411, [0.0, 26.0, 0.0, 0.0, 0.0, 0.0, 0.0, 39.4, 12.1, 7.1, 0.0, 0.0, 0.0, 22.5, 3.7, 0.0, 22.2, 0.0, 25.2, 0.0, 17.6, 10.2, 0.0, 0.0, 36.8, 0.0, 26.9, 0.0, 24.7, 0.0, 15.5, 0.0, 36.5, 38.7, 21.3, 0.0]),
    (7.130, [0.0, 26.5, 31.3, 30.0, 0.0, 0.0, 16.8, 29.0, 33.0, 19.0, 35.7, 0.0, 0.0, 0.0, 0.0, 0.0, 30.4, 0.0, 18.9, 0.0, 0.0, 0.0, 10.5, 0.0, 0.5, 18.7, 0.0, 0.0, 31.4, 25.5, 11.3, 0.0, 0.0, 0.0, 0.0, 0.0]),
    (10.447, [32.4, 0.0, 39.1, 29.9, 29.5, 30.9, 22.3, 5.0, 0.0, 13.5, 38.4, 8.0, 0.0, 38.0, 33.1, 0.0, 0.0, 0.0, 17.7, 0.0, 0.0, 17.3, 0.0, 0.0, 12.9, 15.4, 0.0, 29.3, 0.0, 12.8, 0.0, 30.6, 30.8, 25.9, 20.3, 10.1]),
    (9.248, [0.0, 22.1, 0.0, 6.4, 0.0, 0.6, 0.0, 38.2, 4.1, 25.5, 0.0, 0.0, 19.0, 17.4, 0.0, 21.5, 4.1, 0.0, 18.8, 0.0, 37.0, 25.9, 24.1, 3.6, 0.0, 0.0, 37.2, 0.0, 37.8, 0.0, 0.0, 38.7, 29.9, 0.0, 0.0, 25.3]),
    (8.402, [11.0, 0.0, 0.0, 0.0, 3.6, 10.6, 36.9, 0.0, 0.0, 4.3, 2.8, 38.5, 2.7, 15.5, 11.0, 27.2, 9.9, 9.5, 36.6, 24.9, 0.0, 0.0, 19.9, 0.0, 5.2, 0.0, 34.2, 0.0, 24.4, 38.4, 16.5, 0.0, 5.2, 0.0, 0.0, 36.2]),
    (6.319, [24.4, 12.9, 0.0, 12.7, 0.0, 0.0, 0.0, 21.2, 7.4, 32.1, 11.9, 7.3, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 24.7, 0.0, 15.8, 36.6, 30.2, 0.0, 0.0, 14.6, 2.6, 15.9, 31.6, 10.4, 0.0, 3.6, 38.0, 0.0, 0.0]),
    (8.628, [40.0, 34.7, 32.1, 28.8, 0.0, 5.8, 38.5, 0.0, 0.6, 0.0, 0.0, 3.2, 0.0, 0.0, 18.4, 35.3, 27.7, 22.8, 0.0, 0.0, 18.9, 32.5, 11.2, 0.0, 0.0, 3.9, 0.0, 0.0, 36.5, 32.4, 0.0, 11.4, 6.7, 0.0, 0.0, 0.0]),
    (9.066, [0.0, 36.9, 23.8, 20.6, 0.0, 6.6, 17.7, 37.3, 0.0, 0.0, 39.2, 8.6, 20.1, 20.0, 0.9, 6.9, 0.0, 37.5, 38.3, 0.0, 22.2, 0.0, 14.6, 0.0, 22.4, 0.0, 0.0, 13.5, 0.0, 30.6, 0.0, 37.6, 0.9, 17.4, 0.0, 11.9]),
    (7.314, [0.0, 0.0, 0.0, 0.0, 29.8, 0.5, 30.9, 10.6, 27.8, 2.6, 33.8, 20.3, 0.0, 6.0, 26.7, 8.2, 16.9, 0.0, 0.0, 28.9, 14.6, 17.4, 23.6, 0.0, 0.0, 8.1, 0.0, 0.0, 8.3, 24.0, 0.0, 3.2, 17.5, 1.7, 0.0, 6.8]),
    (7.209, [0.0, 0.0, 0.0, 0.0, 0.0, 17.8, 0.0, 19.3, 0.0, 0.0, 29.2, 8.0, 0.0, 26.7, 18.1, 0.0, 39.4, 0.0, 24.6, 38.2, 0.0, 31.0, 0.0, 0.0, 18.6, 21.7, 0.0, 24.5, 0.0, 15.7, 30.9, 15.1, 0.0, 34.4, 0.0, 0.0]),
    (6.526, [0.0, 0.0, 25.1, 0.0, 18.2, 0.0, 19.4, 27.0, 28.3, 15.8, 31.6, 0.0, 0.0, 1.8, 0.0, 4.9, 8.8, 0.0, 0.0, 1.9, 28.1, 0.0, 0.0, 33.1, 0.0, 0.0, 0.0, 0.0, 30.8, 0.0, 11.0, 23.7, 0.0, 18.2, 3.9, 0.0]),
    (9.735, [11.7, 38.5, 4.5, 0.0, 30.8, 21.1, 32.7, 0.0, 11.3, 19.8, 33.4, 22.1, 23.0, 0.0, 39.0, 0.0, 3.3, 22.7, 34.8, 0.0, 32.7, 0.0, 36.0, 0.0, 0.0, 0.0, 0.0, 31.0, 24.4, 0.0, 0.0, 15.0, 36.3, 0.0, 0.0, 27.0]),
    (9.472, [4.3, 29.1, 0.0, 28.1, 0.3, 0.0, 30.0, 7.0, 10.4, 24.2, 15.2, 0.0, 4.0, 34.9, 4.8, 10.9, 28.1, 0.0, 0.0, 4.5, 30.4, 8.4, 0.0, 0.0, 33.5, 33.7, 30.4, 35.2, 0.0, 0.0, 36.1, 0.2, 0.0, 5.7, 0.0, 38.4]),
    (7.192, [0.0, 5.4, 17.3, 8.2, 14.7, 0.0, 38.5, 3.1, 0.0, 2.9, 18.7, 0.0, 15.8, 0.0, 12.2, 37.5, 3.5, 0.0, 0.0, 0.0, 33.2, 38.0, 15.9, 11.0, 26.6, 0.0, 0.0, 8.3, 10.7, 9.6, 23.7, 1.5, 0.0, 0.0, 0.0, 0.0]),
    (9.954, [7.0, 0.0, 11.0, 4.9, 2.5, 17.8, 0.0, 13.3, 36.6, 0.0, 31.5, 27.5, 39.1, 0.0, 34.0, 0.0, 22.8, 8.8, 15.3, 26.2, 0.0, 26.5, 39.0, 39.4, 26.6, 0.0, 10.5, 0.0, 15.0, 0.1, 0.0, 3.9, 0.0, 11.1, 0.0, 38.2]),
    (7.560, [22.7, 0.0, 8.0, 0.0, 0.0, 0.0, 34.7, 0.0, 19.0, 31.5, 4.0, 23.2, 38.4, 5.7, 0.0, 0.3, 20.1, 0.0, 0.0, 25.0, 17.5, 0.0, 0.0, 0.0, 0.0, 19.2, 38.9, 0.0, 23.4, 36.4, 38.2, 0.0, 0.0, 0.0, 0.0, 0.0]),
    (8.790, [0.0, 0.0, 0.0, 30.4, 0.0, 37.4, 25.7, 30.7, 0.0, 22.2, 10.9, 8.7, 0.0, 0.0, 18.4, 0.0, 0.0, 36.7, 7.4, 4.9, 39.4, 0.0, 0.0, 0.0, 29.4, 0.0, 26.4, 25.1, 16.3, 14.8, 24.1, 19.5, 0.0, 17.7, 4.7, 0.0]),
    (9.235, [12.8, 22.1, 0.0, 21.0, 0.0, 6.7, 30.8, 0.0, 36.0, 1.8, 0.0, 34.5, 2.7, 18.1, 27.7, 19.3, 35.8, 19.5, 0.0, 0.0, 1.7, 0.0, 36.4, 0.0, 0.0, 0.0, 0.0, 5.0, 0.0, 4.5, 38.8, 0.0, 12.7, 10.6, 37.6, 36.0]),
    (7.545, [0.0, 24.0, 0.2, 39.4, 5.3, 0.0, 18.1, 34.1, 13.1, 16.0, 32.9, 35.5, 26.4, 30.1, 30.1, 0.0, 0.0, 10.4, 5.9, 35.5, 3.3, 15.4, 12.2, 0.0, 0.0, 0.0, 0.0, 7.6, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.4]),
    (7.651, [0.0, 0.0, 0.0, 11.2, 0.0, 28.1, 0.0, 11.5, 11.7, 30.9, 40.0, 21.1, 14.1, 0.0, 13.1, 0.0, 13.8, 0.0, 9.3, 37.0, 35.4, 20.7, 0.0, 0.0, 23.8, 4.8, 0.6, 0.0, 0.0, 10.0, 32.9, 10.6, 2.8, 14.6, 10.0, 0.0]),
    (8.071, [0.0, 0.0, 29.7, 10.3, 35.1, 0.0, 0.0, 21.1, 0.0, 15.9, 34.5, 0.0, 1.4, 37.5, 0.0, 14.3, 0.0, 0.0, 12.6, 11.9, 13.6, 0.0, 1.5, 10.4, 0.0, 24.1, 23.3, 0.0, 37.9, 11.5, 0.0, 0.0, 22.7, 0.0, 0.0, 1.5]),
    (7.791, [0.0, 0.0, 24.9, 0.0, 6.4, 0.0, 15.2, 0.0, 18.2, 19.2, 20.2, 9.9, 0.0, 21.7, 7.2, 0.0, 0.0, 0.0, 34.3, 0.0, 29.0, 16.6, 0.0, 26.8, 0.0, 0.0, 30.4, 0.0, 0.0, 27.8, 34.4, 0.0, 0.0, 14.6, 0.0, 23.1]),
    (8.964, [35.3, 39.1, 0.0, 18.4, 0.0, 4.4, 12.3, 39.4, 10.9, 11.9, 0.0, 25.7, 21.8, 0.0, 33.8, 0.0, 3.7, 0.0, 26.7, 0.0, 33.0, 23.0, 2.7, 0.0, 28.4, 34.6, 0.0, 12.7, 12.5, 10.2, 39.4, 23.6, 0.0, 0.0, 0.0, 0.0]),
    (6.865, [1.3, 18.5, 0.0, 9.8, 21.1, 21.6, 1.4, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 12.2, 14.3, 0.0, 0.0, 20.4, 27.3, 0.0, 0.0, 0.0, 33.2, 15.7, 0.0, 38.8, 4.9, 11.6, 0.0, 5.9, 5.8, 29.5, 3.4, 0.0, 0.0]),
    (8.302, [40.0, 37.0, 0.0, 0.0, 6.9, 0.0, 24.3, 15.6, 0.0, 2.8, 15.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 4.1, 7.7, 11.3, 35.9, 0.0, 0.0, 38.5, 33.2, 39.7, 0.0, 14.0, 4.1, 0.0, 35.4, 19.5, 9.2, 28.5, 5.6, 24.0]),
    (6.977, [0.0, 0.0, 0.0, 0.0, 8.6, 6.7, 24.9, 0.0, 0.0, 0.0, 0.0, 2.2, 0.0, 15.1, 13.6, 21.7, 0.0, 34.3, 5.1, 0.0, 0.0, 38.4, 29.2, 18.4, 18.2, 7.7, 24.4, 6.8, 0.0, 39.3, 22.1, 0.0, 9.9, 0.0, 0.0, 21.3]),
    (7.847, [31.9, 28.0, 18.9, 4.5, 11.3, 20.4, 19.7, 30.9, 24.2, 37.4, 32.4, 37.0, 0.0, 37.1, 0.0, 22.0, 0.0, 0.0, 0.0, 0.0, 5.0, 16.8, 3.6, 0.0, 0.0, 7.5, 0.0, 9.6, 24.4, 0.0, 0.0, 0.2, 0.0, 30.6, 1.9, 0.0]),
    (8.468, [18.8, 8.8, 0.0, 29.0, 0.0, 5.5, 31.7, 10.8, 8.9, 0.0, 0.0, 39.9, 1.3, 0.0, 0.0, 0.0, 0.0, 25.5, 0.0, 38.9, 23.1, 0.0, 35.2, 36.8, 0.0, 0.0, 0.0, 0.0, 0.0, 29.2, 0.0, 0.0, 29.7, 32.7, 37.5, 11.0]),
    (9.499, [14.4, 0.0, 0.0, 30.2, 0.0, 18.1, 22.1, 33.8, 8.4, 0.0, 0.0, 34.6, 14.5, 39.0, 4.8, 0.0, 0.0, 21.3, 14.9, 0.0, 0.0, 31.9, 5.4, 38.0, 19.0, 0.0, 2.6, 0.0, 3.2, 20.5, 0.0, 26.2, 30.7, 38.7, 0.0, 0.0]),
    (9.050, [24.6, 19.6, 8.0, 35.2, 0.7, 0.0, 0.0, 28.4, 0.0, 22.1, 33.1, 24.4, 0.0, 35.1, 9.8, 11.1, 5.0, 0.0, 18.8, 35.9, 17.8, 36.0, 0.0, 0.0, 0.0, 0.0, 39.3, 30.6, 0.0, 0.0, 0.0, 0.0, 36.4, 8.6, 15.7, 0.0]),
    (7.528, [8.3, 32.4, 0.0, 23.8, 0.0, 0.0, 0.0, 17.0, 17.4, 33.2, 0.0, 0.0, 0.0, 0.0, 33.1, 24.7, 0.0, 5.4, 27.1, 15.3, 0.0, 0.0, 0.0, 31.1, 0.0, 26.7, 9.6, 37.7, 0.0, 0.0, 19.6, 0.0, 0.0, 21.7, 6.6, 6.6]),
    (8.777, [0.0, 0.0, 0.0, 0.0, 9.7, 34.1, 21.1, 17.6, 0.0, 0.0, 0.0, 35.1, 12.4, 35.3, 0.0, 28.8, 0.0, 0.0, 2.5, 7.0, 0.0, 0.0, 24.2, 11.3, 38.6, 0.0, 0.0, 23.9, 33.0, 0.0, 6.5, 10.6, 33.0, 14.3, 21.6, 0.0]),
    (7.116, [0.0, 39.6, 0.0, 0.0, 32.0, 30.7, 19.2, 36.8, 0.0, 0.0, 0.0, 0.0, 11.5, 0.0, 21.9, 0.0, 36.9, 27.5, 2.5, 26.3, 0.0, 0.0, 1.7, 4.7, 0.0, 0.0, 0.0, 0.0, 18.2, 37.7, 0.0, 0.0, 8.4, 0.0, 0.0, 14.8]),
    (7.013, [16.9, 14.3, 0.0, 27.2, 9.1, 7.2, 0.0, 0.0, 0.0, 0.0, 15.1, 26.4, 26.4, 1.2, 0.0, 22.5, 0.0, 0.0, 20.2, 20.8, 1.9, 17.1, 0.0, 0.0, 9.0, 35.0, 0.0, 0.0, 21.9, 0.0, 0.0, 23.0, 0.0, 18.2, 20.6, 15.1]),
    (7.904, [6.5, 0.0, 11.5, 35.5, 0.0, 38.0, 0.0, 35.3, 0.0, 0.0, 35.4, 0.5, 18.5, 14.8, 10.0, 0.0, 9.8, 0.0, 16.2, 34.2, 23.5, 0.0, 0.0, 14.5, 13.5, 0.0, 0.0, 14.0, 0.0, 27.9, 37.7, 17.8, 21.6, 11.0, 0.0, 1.2]),
    (7.572, [0.0, 25.0, 30.2, 0.0, 21.0, 0.0, 0.0, 37.2, 10.9, 0.0, 9.4, 0.0, 0.0, 0.0, 16.7, 10.1, 3.7, 35.0, 0.0, 0.0, 20.0, 11.1, 0.0, 32.2, 15.9, 33.5, 0.0, 0.0, 14.2, 10.3, 0.0, 34.1, 0.0, 0.0, 0.5, 0.0]),
    (10.186, [0.0, 0.0, 39.0, 0.0, 15.2, 0.0, 0.0, 14.4, 0.0, 37.7, 1.1, 12.2, 8.5, 0.0, 13.2, 0.0, 10.6, 19.6, 26.8, 30.5, 13.4, 0.0, 1.6, 39.0, 30.2, 39.2, 0.0, 18.6, 30.6, 20.6, 2.2, 9.3, 27.4, 0.0, 0.0, 19.3]),
    (6.854, [5.2, 0.0, 20.1, 0.0, 0.0, 0.0, 32.1, 0.0, 0.0, 0.0, 1.4, 0.0, 28.2, 38.4, 8.1, 24.0, 0.0, 25.5, 6.6, 37.0, 0.0, 0.0, 0.0, 0.0, 8.8, 0.0, 0.0, 11.0, 0.0, 0.0, 0.0, 7.5, 15.3, 38.0, 3.0, 24.5]),
    (10.864, [17.7, 0.0, 8.2, 21.1, 39.8, 35.7, 11.8, 9.6, 7.8, 24.7, 8.9, 33.2, 24.1, 0.0, 0.0, 38.4, 0.0, 0.0, 39.4, 33.0, 25.1, 4.1, 0.0, 24.6, 37.8, 33.9, 0.0, 0.0, 36.9, 0.0, 15.2, 6.4, 0.0, 4.0, 5.3, 7.7]),
    (9.403, [19.9, 37.9, 0.0, 29.9, 0.0, 8.0, 0.0, 1.9, 32.6, 39.9, 0.0, 0.0, 18.9, 34.5, 8.0, 30.5, 0.0, 12.7, 0.0, 37.6, 21.5, 34.5, 16.8, 0.0, 3.7, 3.9, 0.0, 8.9, 0.0, 0.0, 1.5, 15.9, 38.9, 39.1, 9.3, 0.0]),
    (7.102, [35.2, 35.5, 21.0, 0.0, 0.0, 0.0, 9.6, 0.0, 0.9, 5.1, 0.0, 0.0, 14.7, 30.0, 0.0, 6.4, 0.0, 7.6, 0.0, 8.9, 0.0, 0.0, 0.0, 8.2, 0.0, 0.0, 2.2, 7.1, 0.0, 25.0, 38.3, 28.9, 0.0, 0.0, 0.0, 20.0]),
    (9.626, [0.0, 0.0, 4.3, 23.8, 19.5, 0.0, 27.7, 0.0, 0.0, 39.8, 0.0, 0.0, 30.0, 0.8, 33.7, 29.9, 35.0, 37.1, 0.0, 4.2, 0.0, 30.4, 0.0, 13.4, 19.1, 0.0, 0.0, 34.5, 25.5, 0.0, 13.4, 24.6, 39.0, 25.9, 0.0, 13.4]),
    (8.410, [30.7, 0.0, 0.0, 26.0, 12.2, 0.0, 0.0, 0.0, 13.1, 0.0, 5.4, 17.0, 9.2, 20.7, 0.0, 39.6, 5.1, 0.0, 20.8, 5.3, 0.0, 16.0, 0.0, 0.0, 19.1, 0.0, 19.3, 26.7, 0.0, 0.0, 38.5, 0.0, 0.0, 36.1, 27.8, 0.0]),
    (7.112, [0.0, 0.0, 20.6, 1.7, 26.6, 0.0, 31.9, 24.0, 0.0, 0.0, 9.5, 0.5, 6.9, 11.4, 0.0, 0.0, 13.8, 0.0, 34.9, 37.9, 14.5, 0.0, 7.2, 5.6, 35.0, 0.0, 0.0, 13.8, 5.9, 0.0, 0.0, 21.6, 16.7, 0.5, 13.0, 0.0]),
    (10.957, [0.0, 10.7, 0.0, 34.7, 32.6, 27.8, 0.0, 24.2, 6.1, 17.0, 36.7, 24.8, 35.5, 24.7, 0.0, 0.0, 14.7, 0.0, 0.0, 0.0, 27.9, 38.6, 0.0, 30.9, 0.0, 0.0, 29.1, 0.0, 18.5, 32.4, 0.0, 38.8, 0.0, 0.0, 33.9, 14.6]),
];
